use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serving::OnnxPlan;

use crate::features;
use crate::models::{ModelInfo, PredictionRequest, PredictionResponse, TeamWinProbability};

pub const DEFAULT_FEATURE_COLUMNS_PATH: &str = "feature_columns.json";
pub const TOP_FEATURES: usize = 5;

/// Predicted label and the probability of each class (index = class).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassOutcome {
    pub label: i64,
    pub probabilities: [f64; 2],
}

pub trait RoundClassifier: Send + Sync {
    fn classify(&self, row: &[f32]) -> anyhow::Result<ClassOutcome>;
}

/// Tree-ensemble classifier exported to ONNX with the label as first output
/// and a plain `[1, 2]` probability tensor as second output.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    pub fn load<P: AsRef<Path>>(model_path: P, n_features: usize) -> anyhow::Result<Self> {
        Ok(Self {
            plan: OnnxPlan::load(model_path, n_features)?,
        })
    }
}

impl RoundClassifier for OnnxClassifier {
    fn classify(&self, row: &[f32]) -> anyhow::Result<ClassOutcome> {
        let outputs = self.plan.run(row)?;

        let labels = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no label output"))?
            .cast_to::<i64>()?;
        let label = labels
            .as_slice::<i64>()?
            .first()
            .copied()
            .ok_or_else(|| anyhow!("model produced an empty label tensor"))?;

        let probabilities: Vec<f32> = outputs
            .get(1)
            .ok_or_else(|| anyhow!("model produced no probability output"))?
            .to_array_view::<f32>()?
            .iter()
            .copied()
            .collect();

        match probabilities.as_slice() {
            &[p0, p1] => Ok(ClassOutcome {
                label,
                probabilities: [p0 as f64, p1 as f64],
            }),
            other => bail!("expected 2 class probabilities, got {}", other.len()),
        }
    }
}

/// Companion artifact: the ordered columns the model was trained on and the
/// model's global importance for each of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureColumns {
    pub feature_columns: Vec<String>,
    pub feature_importances: Vec<f64>,
}

impl FeatureColumns {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("feature columns {} not readable", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid feature columns in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let columns: FeatureColumns = serde_json::from_str(raw)?;
        if columns.feature_columns.is_empty() {
            bail!("no feature columns listed");
        }
        if columns.feature_columns.len() != columns.feature_importances.len() {
            bail!(
                "{} columns but {} importances",
                columns.feature_columns.len(),
                columns.feature_importances.len()
            );
        }
        Ok(columns)
    }

    pub fn len(&self) -> usize {
        self.feature_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_columns.is_empty()
    }

    /// The `k` most important columns, highest first. Equal scores keep
    /// column order.
    pub fn top_importances(&self, k: usize) -> IndexMap<String, f64> {
        let mut ranked: Vec<(&String, f64)> = self
            .feature_columns
            .iter()
            .zip(self.feature_importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
            .into_iter()
            .take(k)
            .map(|(name, score)| (name.clone(), score))
            .collect()
    }
}

/// Classifier plus its column metadata, built once at startup.
pub struct LoadedModel {
    classifier: Box<dyn RoundClassifier>,
    columns: FeatureColumns,
    top_features: IndexMap<String, f64>,
}

impl LoadedModel {
    pub fn new(classifier: impl RoundClassifier + 'static, columns: FeatureColumns) -> Self {
        let top_features = columns.top_importances(TOP_FEATURES);
        LoadedModel {
            classifier: Box::new(classifier),
            columns,
            top_features,
        }
    }

    /// Loads both artifacts; either one missing or unreadable is an error.
    pub fn load<P, Q>(model_path: P, columns_path: Q) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let columns = FeatureColumns::load(columns_path)?;
        let classifier = OnnxClassifier::load(model_path, columns.len())?;
        Ok(Self::new(classifier, columns))
    }

    pub fn columns(&self) -> &FeatureColumns {
        &self.columns
    }

    pub fn predict(&self, req: &PredictionRequest) -> anyhow::Result<PredictionResponse> {
        let row = features::build_row(req, &self.columns.feature_columns)?;
        let outcome = self.classifier.classify(&row)?;
        let [p0, p1] = outcome.probabilities;

        Ok(PredictionResponse {
            prediction: outcome.label,
            probability: if outcome.label == 1 { p1 } else { p0 },
            team_win_probability: TeamWinProbability {
                team_0: p0,
                team_1: p1,
            },
            feature_importance: self.top_features.clone(),
        })
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: "RandomForestClassifier",
            n_features: self.columns.len(),
            feature_names: self.columns.feature_columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the rows it is given and answers with fixed probabilities.
    struct Recording {
        rows: Mutex<Vec<Vec<f32>>>,
        outcome: ClassOutcome,
    }

    impl RoundClassifier for &'static Recording {
        fn classify(&self, row: &[f32]) -> anyhow::Result<ClassOutcome> {
            self.rows.lock().unwrap().push(row.to_vec());
            Ok(self.outcome)
        }
    }

    fn leak(outcome: ClassOutcome) -> &'static Recording {
        Box::leak(Box::new(Recording {
            rows: Mutex::new(Vec::new()),
            outcome,
        }))
    }

    fn columns() -> FeatureColumns {
        FeatureColumns::from_json(
            r#"{
                "feature_columns": ["TimeAlive", "KillEfficiency", "Team_T", "Map_de_cache",
                                    "Survived", "GrenadesThrown", "Unused"],
                "feature_importances": [0.30, 0.25, 0.05, 0.05, 0.20, 0.10, 0.05]
            }"#,
        )
        .unwrap()
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            round_kills: 3.0,
            time_alive: 60.0,
            lethal_grenades: 0.0,
            non_lethal_grenades: 1.0,
            travelled_distance: 1200.0,
            survived: 0,
            team: "CT".to_string(),
            map_name: "de_cache".to_string(),
            abnormal_match: 0,
        }
    }

    #[test]
    fn top_importances_are_sorted_and_capped() {
        let top = columns().top_importances(TOP_FEATURES);
        let names: Vec<&str> = top.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            ["TimeAlive", "KillEfficiency", "Survived", "GrenadesThrown", "Team_T"]
        );
        let scores: Vec<f64> = top.values().copied().collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn fewer_columns_than_top_k() {
        let cols = FeatureColumns::from_json(
            r#"{"feature_columns": ["A", "B"], "feature_importances": [0.1, 0.9]}"#,
        )
        .unwrap();
        let top = cols.top_importances(TOP_FEATURES);
        assert_eq!(top.len(), 2);
        assert_eq!(top.get_index(0), Some((&"B".to_string(), &0.9)));
    }

    #[test]
    fn mismatched_or_empty_artifacts_are_rejected() {
        assert!(FeatureColumns::from_json(
            r#"{"feature_columns": ["A"], "feature_importances": []}"#
        )
        .is_err());
        assert!(FeatureColumns::from_json(
            r#"{"feature_columns": [], "feature_importances": []}"#
        )
        .is_err());
        assert!(FeatureColumns::from_json(r#"["A", "B"]"#).is_err());
    }

    #[test]
    fn missing_companion_artifact_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = LoadedModel::load(
            dir.path().join("random_forest_model.onnx"),
            dir.path().join(DEFAULT_FEATURE_COLUMNS_PATH),
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_model_artifact_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let columns_path = dir.path().join(DEFAULT_FEATURE_COLUMNS_PATH);
        fs::write(&columns_path, serde_json::to_string(&columns()).unwrap()).unwrap();
        let err = LoadedModel::load(dir.path().join("random_forest_model.onnx"), &columns_path)
            .err()
            .unwrap();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn classifier_sees_row_in_artifact_order() {
        let stub = leak(ClassOutcome {
            label: 0,
            probabilities: [0.8, 0.2],
        });
        let model = LoadedModel::new(stub, columns());
        model.predict(&request()).unwrap();

        let rows = stub.rows.lock().unwrap();
        let kill_efficiency = (3.0 / (60.0 + features::EPSILON)) as f32;
        assert_eq!(rows[0], vec![60.0, kill_efficiency, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn probability_matches_predicted_class() {
        let win = LoadedModel::new(
            leak(ClassOutcome {
                label: 1,
                probabilities: [0.35, 0.65],
            }),
            columns(),
        );
        let response = win.predict(&request()).unwrap();
        assert_eq!(response.prediction, 1);
        assert_eq!(response.probability, 0.65);
        assert!((response.team_win_probability.team_0 + response.team_win_probability.team_1 - 1.0).abs() < 1e-9);

        let loss = LoadedModel::new(
            leak(ClassOutcome {
                label: 0,
                probabilities: [0.9, 0.1],
            }),
            columns(),
        );
        let response = loss.predict(&request()).unwrap();
        assert_eq!(response.prediction, 0);
        assert_eq!(response.probability, 0.9);
        assert_eq!(response.feature_importance.len(), TOP_FEATURES);
    }

    #[test]
    fn info_lists_artifact_columns() {
        let model = LoadedModel::new(
            leak(ClassOutcome {
                label: 0,
                probabilities: [0.5, 0.5],
            }),
            columns(),
        );
        let info = model.info();
        assert_eq!(info.model_type, "RandomForestClassifier");
        assert_eq!(info.n_features, 7);
        assert_eq!(info.feature_names[1], "KillEfficiency");
    }
}
