mod config;
mod error;
mod export;
mod inference;
mod routes;
mod session;
mod state;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use config::AppConfig;
use routes::configure_routes;
use state::{AppState, ModelState};
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let model = ModelState::load(&config).await;
    if let ModelState::Ready { info, .. } = &model {
        log::info!("Model ready from {} ({} bytes)", info.source, info.bytes);
    }
    if let Some(message) = model.error() {
        if config.model.fail_fast {
            return Err(std::io::Error::other(format!(
                "Model loading failed: {}",
                message
            )));
        }
        log::warn!("Serving without a model: {}", message);
    }

    let bind_address = config.bind_address();
    let frontend_dir = config.server.frontend_dir.clone();
    if !frontend_dir.is_dir() {
        log::warn!(
            "Frontend bundle not found at {}; build it with `trunk build` in frontend/",
            frontend_dir.display()
        );
    }

    let state = web::Data::new(AppState::new(config, model));

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(state.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
