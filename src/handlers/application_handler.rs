use actix_web::{delete, post, route, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_owner, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{
            ApplicationSearchQuery, ApplyRequest, EmailBody, OwnerDeleteQuery,
            RegistrationCheckRequest, UpdateRequest,
        },
        response::{
            to_dtos, ApplicationDto, DeleteResponse, InsertResponse, RegisteredResponse,
            UpdateResponse,
        },
    },
};

/// Served at both `/my-applies` and the older `/my-applications`.
pub async fn my_applications(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<ApplicationSearchQuery>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*query)?;

    let applications = state
        .application_service
        .list_for(&query.email, query.search.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(to_dtos::<_, ApplicationDto>(applications)))
}

#[route("/update-application", method = "PUT", method = "PATCH")]
pub async fn update_application(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<UpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    require_owner(&auth.0, &request)?;

    let outcome = state.application_service.update(request).await?;
    Ok(HttpResponse::Ok().json(UpdateResponse::from(outcome)))
}

#[delete("/my-applies/delete")]
pub async fn withdraw_application(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<OwnerDeleteQuery>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*query)?;

    state.application_service.withdraw(&query.id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse::new(1)))
}

#[post("/is-already-applied")]
pub async fn is_already_applied(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<RegistrationCheckRequest>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*body)?;

    let registered = state
        .application_service
        .is_registered(&body.email, &body.marathon_id)
        .await?;
    Ok(HttpResponse::Ok().json(RegisteredResponse { registered }))
}

#[post("/marathon-apply")]
pub async fn apply_to_marathon(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<ApplyRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    require_owner(&auth.0, &request)?;

    let application = state.application_service.apply(request).await?;
    Ok(HttpResponse::Ok().json(InsertResponse::new(application.id.to_hex())))
}

#[post("/entries-count")]
pub async fn entries_count(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<EmailBody>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*body)?;

    let count = state.application_service.entries_count(&body.email).await?;
    Ok(HttpResponse::Ok().json(count))
}
