use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serving::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Model not loaded")]
    Unavailable,

    /// Anything that goes wrong while building features or running the model.
    #[error("Prediction failed: {0}")]
    Processing(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Processing(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}
