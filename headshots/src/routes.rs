use actix_web::{get, post, web, HttpResponse};
use log::{error, info, warn};
use serving::{HealthStatus, RootInfo};
use validator::Validate;

use crate::error::ApiError;
use crate::inference::predict_headshots;
use crate::types::{ModelInfo, PlayerStats};
use crate::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(serving::json_config())
        .service(root)
        .service(health)
        .service(predict)
        .service(model_info)
        .default_service(web::route().to(serving::not_found));
}

#[get("/")]
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(RootInfo::active("CS Headshot Predictor API"))
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus::new(
        state.model_loaded(),
        env!("CARGO_PKG_VERSION"),
    ))
}

#[post("/predict")]
async fn predict(
    state: web::Data<AppState>,
    stats: web::Json<PlayerStats>,
) -> Result<HttpResponse, ApiError> {
    stats.validate().map_err(|e| {
        warn!("Rejected player stats: {}", e);
        ApiError::InvalidInput(e.to_string())
    })?;

    let model = state.model()?;
    let response = predict_headshots(model, &stats).map_err(|e| {
        error!("Prediction failed: {:#}", e);
        ApiError::Processing
    })?;

    info!(
        "Predicted {:.2} headshots for {} round kills",
        response.predicted_headshots, stats.round_kills
    );
    Ok(HttpResponse::Ok().json(response))
}

#[get("/model-info")]
async fn model_info() -> HttpResponse {
    HttpResponse::Ok().json(ModelInfo::from_schema())
}
