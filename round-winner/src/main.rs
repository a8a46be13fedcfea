use std::path::PathBuf;

use actix_web::web;
use anyhow::Context;
use log::{error, info};
use round_winner::inference::{LoadedModel, DEFAULT_FEATURE_COLUMNS_PATH};
use round_winner::{routes, AppState};
use serving::ServerConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    serving::logging::init();

    info!("Starting CS Round Winner Predictor");

    let config = ServerConfig::from_env();
    let columns_path = std::env::var("FEATURE_COLUMNS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FEATURE_COLUMNS_PATH));

    // No degraded mode here: both artifacts or no server.
    let model = LoadedModel::load(&config.model_path, &columns_path)
        .inspect_err(|e| error!("Could not load the model: {:#}", e))
        .context("refusing to start without a model")?;
    info!(
        "Model loaded from {} ({} features)",
        config.model_path.display(),
        model.columns().len()
    );

    let state = web::Data::new(AppState::loaded(model));
    serving::serve(&config, state, routes::configure).await?;
    Ok(())
}
