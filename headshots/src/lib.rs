//! Counter-Strike headshot regression service.

pub mod error;
pub mod inference;
pub mod routes;
pub mod types;

use error::ApiError;
use inference::HeadshotRegressor;

/// Shared read-only state. The model is absent when its artifact could not be
/// loaded; the service keeps running and reports itself unhealthy.
pub struct AppState {
    model: Option<Box<dyn HeadshotRegressor>>,
}

impl AppState {
    pub fn loaded(model: impl HeadshotRegressor + 'static) -> Self {
        AppState {
            model: Some(Box::new(model)),
        }
    }

    pub fn without_model() -> Self {
        AppState { model: None }
    }

    pub fn model(&self) -> Result<&dyn HeadshotRegressor, ApiError> {
        self.model.as_deref().ok_or(ApiError::Unavailable)
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}
