use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use log::info;

use crate::ServerConfig;

/// Binds and runs the HTTP server until shutdown. `state` is shared by every
/// worker; `configure` registers the service's routes.
pub async fn serve<T>(
    config: &ServerConfig,
    state: web::Data<T>,
    configure: fn(&mut web::ServiceConfig),
) -> std::io::Result<()>
where
    T: Send + Sync + 'static,
{
    let bind_address = config.bind_address();

    info!("Listening on http://{}", bind_address);
    info!("Workers: {}", config.workers);
    info!("Endpoints:");
    info!("   GET  /            - Service banner");
    info!("   GET  /health      - Health check");
    info!("   GET  /model-info  - Model information");
    info!("   POST /predict     - Prediction");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .workers(config.workers)
    .bind(&bind_address)?
    .run()
    .await
}
