use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Round statistics for one player, as posted to `/predict`.
///
/// Only the JSON types are enforced; numeric ranges are left to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub round_kills: f64,
    pub time_alive: f64,
    pub lethal_grenades: f64,
    pub non_lethal_grenades: f64,
    pub travelled_distance: f64,
    /// 0 or 1
    pub survived: i64,
    /// "CT" or "T"
    pub team: String,
    pub map_name: String,
    /// 0 or 1
    pub abnormal_match: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamWinProbability {
    pub team_0: f64,
    pub team_1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: i64,
    /// Probability of the predicted class.
    pub probability: f64,
    pub team_win_probability: TeamWinProbability,
    /// Top global importances, highest first.
    pub feature_importance: IndexMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_type: &'static str,
    pub n_features: usize,
    pub feature_names: Vec<String>,
}
