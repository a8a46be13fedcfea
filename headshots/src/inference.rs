use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, bail};
use ort::session::Session;
use ort::value::Tensor;

use crate::types::{ModelSummary, PlayerStats, PredictionResponse, N_FEATURES};

/// Fixed confidence reported with every prediction. Not derived from the
/// model.
pub const CONFIDENCE_PLACEHOLDER: f64 = 0.85;
pub const MAX_HEADSHOTS: f64 = 5.0;

pub trait HeadshotRegressor: Send + Sync {
    fn predict(&self, features: &[f32; N_FEATURES]) -> anyhow::Result<f32>;
}

/// Random Forest regressor exported to ONNX (`TreeEnsembleRegressor`), run
/// through ONNX Runtime. `run` needs `&mut Session`, hence the lock.
pub struct OnnxRegressor {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxRegressor {
    pub fn load<P: AsRef<Path>>(model_path: P) -> anyhow::Result<Self> {
        let path = model_path.as_ref();
        if !path.is_file() {
            bail!("model artifact {} not found", path.display());
        }

        let session = Session::builder()
            .map_err(|e| anyhow!("ONNX session builder error: {}", e))?
            .commit_from_file(path)
            .map_err(|e| anyhow!("failed to load ONNX model from {}: {}", path.display(), e))?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| anyhow!("model {} declares no inputs", path.display()))?;

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl HeadshotRegressor for OnnxRegressor {
    fn predict(&self, features: &[f32; N_FEATURES]) -> anyhow::Result<f32> {
        let input = Tensor::from_array((vec![1_i64, N_FEATURES as i64], features.to_vec()))
            .map_err(|e| anyhow!("tensor creation error: {}", e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("model session lock poisoned"))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| anyhow!("ONNX inference error: {}", e))?;

        let (_, values) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| anyhow!("output tensor extract error: {}", e))?;
        let value = values
            .first()
            .copied()
            .ok_or_else(|| anyhow!("model produced an empty output tensor"))?;
        Ok(value)
    }
}

pub fn clamp_headshots(raw: f64) -> f64 {
    raw.clamp(0.0, MAX_HEADSHOTS)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Runs the regressor on already validated stats and shapes the response.
pub fn predict_headshots(
    model: &dyn HeadshotRegressor,
    stats: &PlayerStats,
) -> anyhow::Result<PredictionResponse> {
    let raw = f64::from(model.predict(&stats.to_array())?);
    if !raw.is_finite() {
        bail!("model returned a non-finite prediction ({})", raw);
    }

    Ok(PredictionResponse {
        predicted_headshots: round2(clamp_headshots(raw)),
        confidence_score: round2(CONFIDENCE_PLACEHOLDER),
        player_stats: *stats,
        model_info: ModelSummary::random_forest(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f32);

    impl HeadshotRegressor for Fixed {
        fn predict(&self, _features: &[f32; N_FEATURES]) -> anyhow::Result<f32> {
            Ok(self.0)
        }
    }

    fn idle() -> PlayerStats {
        PlayerStats {
            match_kills: 0,
            round_kills: 0,
            round_assists: 0,
            round_flank_kills: 0,
            round_starting_equipment_value: 0,
            primary_assault_rifle: 0,
            primary_sniper_rifle: 0,
        }
    }

    #[test]
    fn clamps_into_range() {
        assert_eq!(clamp_headshots(-0.4), 0.0);
        assert_eq!(clamp_headshots(7.2), MAX_HEADSHOTS);
        assert_eq!(clamp_headshots(1.5), 1.5);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(0.005_1), 0.01);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn prediction_is_clamped_rounded_and_confident() {
        let response = predict_headshots(&Fixed(0.123_456), &idle()).unwrap();
        assert_eq!(response.predicted_headshots, 0.12);
        assert_eq!(response.confidence_score, 0.85);
        assert_eq!(response.player_stats, idle());

        let high = predict_headshots(&Fixed(9.7), &idle()).unwrap();
        assert_eq!(high.predicted_headshots, 5.0);

        let low = predict_headshots(&Fixed(-1.0), &idle()).unwrap();
        assert_eq!(low.predicted_headshots, 0.0);
    }

    #[test]
    fn non_finite_prediction_is_an_error() {
        assert!(predict_headshots(&Fixed(f32::NAN), &idle()).is_err());
    }

    #[test]
    fn missing_artifact_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        assert!(OnnxRegressor::load(dir.path().join("random_forest_model.onnx")).is_err());
    }
}
