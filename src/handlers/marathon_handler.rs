use actix_web::{delete, get, post, route, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_owner, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{
            EmailBody, EmailQuery, MarathonListQuery, NewMarathonRequest, OwnerDeleteQuery,
            UpdateRequest,
        },
        response::{
            to_dtos, CountResponse, DeleteResponse, InsertResponse, MarathonDto, UpdateResponse,
        },
    },
};

/// Landing page: the first six marathons.
#[get("/")]
pub async fn featured_marathons(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let marathons = state.marathon_service.featured().await?;
    Ok(HttpResponse::Ok().json(to_dtos::<_, MarathonDto>(marathons)))
}

#[get("/marathons")]
pub async fn list_marathons(
    state: web::Data<AppState>,
    query: web::Query<MarathonListQuery>,
) -> Result<HttpResponse, AppError> {
    let marathons = state.marathon_service.list_page(&query).await?;
    Ok(HttpResponse::Ok().json(to_dtos::<_, MarathonDto>(marathons)))
}

#[get("/total-marathons")]
pub async fn total_marathons(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let count = state.marathon_service.total_count().await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

#[post("/marathons")]
pub async fn list_all_marathons(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<EmailBody>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*body)?;

    let marathons = state.marathon_service.list_all().await?;
    Ok(HttpResponse::Ok().json(to_dtos::<_, MarathonDto>(marathons)))
}

#[post("/marathons/{id}")]
pub async fn marathon_details(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    id: web::Path<String>,
    body: web::Json<EmailBody>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*body)?;

    let marathon = state.marathon_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(MarathonDto::from(marathon)))
}

#[post("/add-marathon")]
pub async fn add_marathon(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<NewMarathonRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    require_owner(&auth.0, &request)?;

    let marathon = state.marathon_service.create(request).await?;
    Ok(HttpResponse::Ok().json(InsertResponse::new(marathon.id.to_hex())))
}

#[get("/my-marathons")]
pub async fn my_marathons(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*query)?;

    let marathons = state.marathon_service.list_created_by(&query.email).await?;
    Ok(HttpResponse::Ok().json(to_dtos::<_, MarathonDto>(marathons)))
}

#[route("/my-marathons/update", method = "PUT", method = "PATCH")]
pub async fn update_marathon(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    body: web::Json<UpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    require_owner(&auth.0, &request)?;

    let outcome = state.marathon_service.update(request).await?;
    Ok(HttpResponse::Ok().json(UpdateResponse::from(outcome)))
}

#[delete("/my-marathons/delete")]
pub async fn delete_marathon(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<OwnerDeleteQuery>,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &*query)?;

    let deleted = state.marathon_service.delete(&query.id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse::new(deleted)))
}
