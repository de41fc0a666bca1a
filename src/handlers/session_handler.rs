use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{request::SignInRequest, response::SuccessResponse},
};

/// Issues the session cookie for a user the front-end has signed in.
#[post("/jwt")]
pub async fn sign_in(
    state: web::Data<AppState>,
    request: web::Json<SignInRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let email = request.email.clone();
    let token = state.jwt_service.create_token(request)?;
    log::info!("Session issued for {}", email);

    Ok(HttpResponse::Ok()
        .cookie(state.cookie_policy.session_cookie(token))
        .json(SuccessResponse::ok()))
}

#[post("/logout")]
pub async fn sign_out(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.cookie_policy.removal_cookie())
        .json(SuccessResponse::ok())
}
