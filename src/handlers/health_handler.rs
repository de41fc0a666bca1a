use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::app_state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
struct Readiness<'a> {
    status: &'static str,
    version: &'static str,
    database: Option<&'a str>,
    collections: [&'a str; 2],
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy", "version": VERSION }))
}

/// Ready once MongoDB answers a ping. Reports which database and
/// collections the registration data lives in.
#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => Some(db.db_name()),
            Err(e) => {
                log::warn!("MongoDB database '{}' did not answer ping: {}", db.db_name(), e);
                None
            }
        },
        None => None,
    };

    let readiness = Readiness {
        status: if database.is_some() { "ready" } else { "not_ready" },
        version: VERSION,
        database,
        collections: [
            state.config.marathons_collection.as_str(),
            state.config.applications_collection.as_str(),
        ],
    };

    if database.is_some() {
        HttpResponse::Ok().json(readiness)
    } else {
        HttpResponse::ServiceUnavailable().json(readiness)
    }
}

#[get("/health/live")]
pub async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive", "version": VERSION }))
}
