use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serving::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Model not loaded")]
    Unavailable,

    #[error("{0}")]
    InvalidInput(String),

    /// The cause is logged where it happens and never sent to the client.
    #[error("Error processing prediction")]
    Processing,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unavailable | ApiError::Processing => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}
