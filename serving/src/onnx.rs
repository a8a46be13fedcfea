use std::path::Path;

use anyhow::{bail, Context};
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// An optimized, runnable ONNX graph taking a single `f32[1, n_features]` row.
pub struct OnnxPlan {
    model: Plan,
    n_features: usize,
}

impl OnnxPlan {
    pub fn load<P: AsRef<Path>>(model_path: P, n_features: usize) -> anyhow::Result<Self> {
        let path = model_path.as_ref();
        if !path.is_file() {
            bail!("model artifact {} not found", path.display());
        }

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, n_features)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .with_context(|| format!("failed to load ONNX model from {}", path.display()))?;

        Ok(Self { model, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Runs the graph on one row and returns every output tensor.
    pub fn run(&self, row: &[f32]) -> anyhow::Result<TVec<TValue>> {
        if row.len() != self.n_features {
            bail!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            );
        }
        let input = Tensor::from_shape(&[1, self.n_features], row)?;
        self.model.run(tvec!(input.into()))
    }
}
