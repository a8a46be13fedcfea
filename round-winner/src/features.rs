//! Turns a [`PredictionRequest`] into the numeric row the classifier was
//! trained on.
//!
//! The row is keyed by column name: raw statistics, one-hot team and map
//! indicators and three derived ratios. The model's column list decides which
//! of those are used and in what order.

use thiserror::Error;

use crate::models::PredictionRequest;

/// Added to `TimeAlive` before dividing by it.
pub const EPSILON: f64 = 1e-5;

/// Maps with an indicator column. Any other map name leaves all four at 0.
pub const KNOWN_MAPS: [(&str, &str); 4] = [
    ("de_dust2", "Map_de_dust2"),
    ("de_mirage", "Map_de_mirage"),
    ("de_inferno", "Map_de_inferno"),
    ("de_cache", "Map_de_cache"),
];

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("feature {column} is not a finite number ({value})")]
    NonFinite { column: String, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub kill_efficiency: f64,
    pub grenades_thrown: f64,
    pub aggression_index: f64,
}

impl DerivedFeatures {
    pub fn from_request(req: &PredictionRequest) -> Self {
        let grenades_thrown = req.lethal_grenades + req.non_lethal_grenades;
        let alive = req.time_alive + EPSILON;
        DerivedFeatures {
            kill_efficiency: req.round_kills / alive,
            grenades_thrown,
            aggression_index: (grenades_thrown + req.travelled_distance) / alive,
        }
    }
}

/// Every column this builder knows how to produce, in a fixed order.
pub fn named_features(req: &PredictionRequest) -> Vec<(&'static str, f64)> {
    let derived = DerivedFeatures::from_request(req);
    let mut columns = vec![
        ("RoundKills", req.round_kills),
        ("TimeAlive", req.time_alive),
        ("RLethalGrenadesThrown", req.lethal_grenades),
        ("RNonLethalGrenadesThrown", req.non_lethal_grenades),
        ("TravelledDistance", req.travelled_distance),
        ("Survived", req.survived as f64),
        ("AbnormalMatch", req.abnormal_match as f64),
        ("Team_T", indicator(req.team == "T")),
    ];
    columns.extend(
        KNOWN_MAPS
            .iter()
            .map(|(map, column)| (*column, indicator(req.map_name == *map))),
    );
    columns.extend([
        ("KillEfficiency", derived.kill_efficiency),
        ("GrenadesThrown", derived.grenades_thrown),
        ("AggressionIndex", derived.aggression_index),
    ]);
    columns
}

/// Builds the row in exactly the order of `columns`. Columns the builder does
/// not produce are 0; produced columns missing from `columns` are dropped.
pub fn build_row(req: &PredictionRequest, columns: &[String]) -> Result<Vec<f32>, FeatureError> {
    let named = named_features(req);
    columns
        .iter()
        .map(|column| {
            let value = named
                .iter()
                .find(|(name, _)| *name == column.as_str())
                .map_or(0.0, |(_, value)| *value);
            let cast = value as f32;
            if cast.is_finite() {
                Ok(cast)
            } else {
                Err(FeatureError::NonFinite {
                    column: column.clone(),
                    value,
                })
            }
        })
        .collect()
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
