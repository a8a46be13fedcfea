use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// One input column of the regressor: JSON field, display name and the
/// accepted inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
}

impl FieldSpec {
    pub fn range_label(&self) -> String {
        if (self.min, self.max) == (0, 1) {
            "0 or 1".to_string()
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

/// Model input columns in feature order. The `#[validate]` bounds on
/// [`PlayerStats`] must agree with this table.
pub const FIELDS: [FieldSpec; 7] = [
    FieldSpec { name: "match_kills", label: "Match Kills", min: 0, max: 100 },
    FieldSpec { name: "round_kills", label: "Round Kills", min: 0, max: 100 },
    FieldSpec { name: "round_assists", label: "Round Assists", min: 0, max: 100 },
    FieldSpec { name: "round_flank_kills", label: "Round Flank Kills", min: 0, max: 100 },
    FieldSpec {
        name: "round_starting_equipment_value",
        label: "Round Starting Equipment Value",
        min: 0,
        max: 16000,
    },
    FieldSpec { name: "primary_assault_rifle", label: "Primary Assault Rifle", min: 0, max: 1 },
    FieldSpec { name: "primary_sniper_rifle", label: "Primary Sniper Rifle", min: 0, max: 1 },
];

pub const N_FEATURES: usize = FIELDS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PlayerStats {
    /// Total kills in the match
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 100))]
    pub match_kills: i64,
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 100))]
    pub round_kills: i64,
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 100))]
    pub round_assists: i64,
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 100))]
    pub round_flank_kills: i64,
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 16000))]
    pub round_starting_equipment_value: i64,
    /// 1 when the primary weapon is an assault rifle
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 1))]
    pub primary_assault_rifle: i64,
    /// 1 when the primary weapon is a sniper rifle
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 1))]
    pub primary_sniper_rifle: i64,
}

/// Accepts JSON integers and floats with no fractional part (`3` or `3.0`).
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(value) => Ok(value),
        Number::Float(value)
            if value.fract() == 0.0 && value.abs() < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        Number::Float(value) => Err(serde::de::Error::custom(format!(
            "expected a whole number, got {}",
            value
        ))),
    }
}

impl PlayerStats {
    /// Feature vector in [`FIELDS`] order.
    pub fn to_array(&self) -> [f32; N_FEATURES] {
        [
            self.match_kills as f32,
            self.round_kills as f32,
            self.round_assists as f32,
            self.round_flank_kills as f32,
            self.round_starting_equipment_value as f32,
            self.primary_assault_rifle as f32,
            self.primary_sniper_rifle as f32,
        ]
    }
}

/// Static description of the served model, attached to every prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_type: String,
    pub features_used: usize,
    pub prediction_range: String,
    pub accuracy_note: String,
}

impl ModelSummary {
    pub fn random_forest() -> Self {
        ModelSummary {
            model_type: "Random Forest Regressor".to_string(),
            features_used: N_FEATURES,
            prediction_range: "0-5 headshots".to_string(),
            accuracy_note: "Trained model loaded from its ONNX artifact".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_headshots: f64,
    pub confidence_score: f64,
    pub player_stats: PlayerStats,
    pub model_info: ModelSummary,
}

/// Body of `/model-info`, generated from [`FIELDS`].
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub model_type: &'static str,
    pub features: Vec<&'static str>,
    pub target: &'static str,
    pub description: &'static str,
    pub input_ranges: IndexMap<&'static str, String>,
}

impl ModelInfo {
    pub fn from_schema() -> Self {
        ModelInfo {
            model_type: "Random Forest Regressor",
            features: FIELDS.iter().map(|f| f.label).collect(),
            target: "Round Headshots",
            description: "Predicts the number of headshots a player will achieve in a CS round",
            input_ranges: FIELDS.iter().map(|f| (f.name, f.range_label())).collect(),
        }
    }
}
