use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use log::warn;
use serde::Serialize;

const JSON_LIMIT: usize = 64 * 1024;

/// Body of every error response: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        ErrorBody {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RootInfo {
    pub message: &'static str,
    pub status: &'static str,
}

impl RootInfo {
    pub fn active(message: &'static str) -> Self {
        RootInfo {
            message,
            status: "active",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub model_loaded: bool,
    pub version: &'static str,
}

impl HealthStatus {
    pub fn new(model_loaded: bool, version: &'static str) -> Self {
        HealthStatus {
            status: if model_loaded { "healthy" } else { "unhealthy" },
            model_loaded,
            version,
        }
    }
}

/// JSON extractor settings: bodies that fail to parse or do not match the
/// request type are answered with 422.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let detail = err.to_string();
            warn!("Rejected request body: {}", detail);
            InternalError::from_response(err, HttpResponse::UnprocessableEntity().json(ErrorBody::new(detail)))
                .into()
        })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("Not Found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reflects_model_presence() {
        let up = HealthStatus::new(true, "1.0.0");
        assert_eq!(up.status, "healthy");
        assert!(up.model_loaded);

        let down = HealthStatus::new(false, "1.0.0");
        assert_eq!(down.status, "unhealthy");
        assert!(!down.model_loaded);
    }
}
