use actix_web::web;

use crate::{
    auth::AuthMiddleware,
    errors::AppError,
    handlers::{application_handler, health_handler, marathon_handler, session_handler},
};

/// Registers every endpoint. Public routes come first; everything else sits
/// in an unprefixed scope behind the session-cookie guard.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .service(health_handler::health_check)
    .service(health_handler::health_check_ready)
    .service(health_handler::health_check_live)
    .service(marathon_handler::featured_marathons)
    .service(marathon_handler::list_marathons)
    .service(marathon_handler::total_marathons)
    .service(session_handler::sign_in)
    .service(session_handler::sign_out)
    .service(
        web::scope("")
            .wrap(AuthMiddleware)
            .route("/my-applies", web::get().to(application_handler::my_applications))
            .route("/my-applications", web::get().to(application_handler::my_applications))
            .service(application_handler::withdraw_application)
            .service(application_handler::update_application)
            .service(application_handler::is_already_applied)
            .service(application_handler::apply_to_marathon)
            .service(application_handler::entries_count)
            .service(marathon_handler::add_marathon)
            .service(marathon_handler::list_all_marathons)
            .service(marathon_handler::marathon_details)
            .service(marathon_handler::my_marathons)
            .service(marathon_handler::update_marathon)
            .service(marathon_handler::delete_marathon),
    );
}
