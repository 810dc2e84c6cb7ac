use actix_web::{get, http::Method, post, web, HttpResponse};
use chrono::Local;

use crate::{
    api::{error::ApiError, AppState},
    logic::activity::{add_log, sorted_logs},
    models::request::{
        farm_links, link, ApiResponse, ErrorResponse, LogApiResponse, LogListApiResponse,
        LogListResponse, NewLogRequest,
    },
    storage::FarmKey,
};

/// GET /api/farms/{key}/logs
/// Activity logs, newest first.
#[utoipa::path(
    get,
    path = "/api/farms/{key}/logs",
    tag = "logs",
    params(("key" = String, Path, description = "Farm key")),
    responses((status = 200, description = "Activity logs", body = LogListApiResponse))
)]
#[get("/farms/{key}/logs")]
pub async fn list_logs(state: web::Data<AppState>, path: web::Path<FarmKey>) -> HttpResponse {
    let key = path.into_inner();
    let farm = state.repo.lock().await.load(key);
    let logs = sorted_logs(&farm);
    HttpResponse::Ok().json(ApiResponse::new(LogListResponse { logs }, farm_links(key)))
}

/// POST /api/farms/{key}/logs
/// Records work done on a plot.
#[utoipa::path(
    post,
    path = "/api/farms/{key}/logs",
    tag = "logs",
    params(("key" = String, Path, description = "Farm key")),
    request_body = NewLogRequest,
    responses(
        (status = 201, description = "Log recorded", body = LogApiResponse),
        (status = 400, description = "Blank notes", body = ErrorResponse),
        (status = 404, description = "Unknown plot", body = ErrorResponse),
    )
)]
#[post("/farms/{key}/logs")]
pub async fn post_log(
    state: web::Data<AppState>,
    path: web::Path<FarmKey>,
    body: web::Json<NewLogRequest>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let request = body.into_inner();
    if request.notes.trim().is_empty() {
        return Err(ApiError::BadRequest("Log notes must not be empty.".into()));
    }

    let mut repo = state.repo.lock().await;
    let farm = repo.load(key);
    let date = request.date.unwrap_or_else(|| Local::now().date_naive());
    let (updated, created) = add_log(&farm, &request.plot_id, date, request.kind, &request.notes)
        .ok_or_else(|| ApiError::plot_not_found(request.plot_id.clone()))?;
    repo.save(key, &updated)?;

    let mut links = farm_links(key);
    links.insert(
        "plot".into(),
        link(
            format!("/api/farms/{}/plots/{}", key.as_str(), created.plot_id),
            Method::PUT,
        ),
    );
    Ok(HttpResponse::Created().json(ApiResponse::new(created, links)))
}
