use actix_web::{get, post, web, HttpResponse};
use log::{debug, error};
use serving::{HealthStatus, RootInfo};

use crate::error::ApiError;
use crate::models::PredictionRequest;
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
    HttpResponse::Ok().json(RootInfo::active("CS Round Winner Predictor API"))
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
    req: web::Json<PredictionRequest>,
) -> Result<HttpResponse, ApiError> {
    let model = state.model()?;

    let response = model.predict(&req).map_err(|e| {
        error!("Prediction failed: {:#}", e);
        ApiError::Processing(format!("{:#}", e))
    })?;

    debug!(
        "Predicted class {} (p={:.3}) on {}",
        response.prediction, response.probability, req.map_name
    );
    Ok(HttpResponse::Ok().json(response))
}

#[get("/model-info")]
async fn model_info(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let model = state.model()?;
    Ok(HttpResponse::Ok().json(model.info()))
}
