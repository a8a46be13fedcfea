use actix_web::web;
use headshots::inference::OnnxRegressor;
use headshots::{routes, AppState};
use log::{error, info, warn};
use serving::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    serving::logging::init();

    info!("Starting CS Headshot Predictor");

    let config = ServerConfig::from_env();

    let state = match OnnxRegressor::load(&config.model_path) {
        Ok(model) => {
            info!("Model loaded from {}", config.model_path.display());
            AppState::loaded(model)
        }
        Err(e) => {
            error!("Could not load the model: {:#}", e);
            warn!("Serving without a model; /predict will answer 500");
            AppState::without_model()
        }
    };

    serving::serve(&config, web::Data::new(state), routes::configure).await
}
