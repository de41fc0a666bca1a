use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use marathon_server::{
    app_state::AppState, config::Config, middleware::RequestIdMiddleware, routes,
};

fn cors(config: &Config) -> Cors {
    config
        .cors_allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.is_production() {
        config.validate_for_production();
    }

    let bind_address = (config.web_server_host.clone(), config.web_server_port);

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!(
        "Starting HTTP server on {}:{} ({})",
        bind_address.0,
        bind_address.1,
        state.config.app_env
    );

    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_state.clone()))
            .wrap(cors(&server_state.config))
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;

    if let Some(db) = state.db {
        db.shutdown().await;
    }

    Ok(())
}
