//! Counter-Strike round-winner prediction service.

pub mod error;
pub mod features;
pub mod inference;
pub mod models;
pub mod routes;

use error::ApiError;
use inference::LoadedModel;

/// Process-wide state, built before the server starts and shared read-only
/// by every worker.
pub struct AppState {
    model: Option<LoadedModel>,
}

impl AppState {
    pub fn loaded(model: LoadedModel) -> Self {
        AppState { model: Some(model) }
    }

    pub fn without_model() -> Self {
        AppState { model: None }
    }

    pub fn model(&self) -> Result<&LoadedModel, ApiError> {
        self.model.as_ref().ok_or(ApiError::Unavailable)
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}
