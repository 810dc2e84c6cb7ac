use actix_web::{delete, get, http::Method, post, web, HttpResponse};
use chrono::Utc;
use log::info;

use crate::{
    api::{error::ApiError, AppState},
    data::crops::{guide_link, is_built_in, merge_catalogue},
    models::{
        crop::Crop,
        request::{
            link, ApiResponse, CropApiResponse, CropListApiResponse, CropListResponse,
            CropResponse, ErrorResponse, Links, NewCropRequest,
        },
    },
};

fn crop_response(crop: Crop) -> CropResponse {
    let guide_url = guide_link(&crop.id);
    CropResponse { crop, guide_url }
}

fn collection_links() -> Links {
    let mut links = Links::new();
    links.insert("self".into(), link("/api/crops", Method::GET));
    links.insert("create".into(), link("/api/crops", Method::POST));
    links
}

/// GET /api/crops
/// Built-in crops followed by custom ones.
#[utoipa::path(
    get,
    path = "/api/crops",
    tag = "crops",
    responses((status = 200, description = "Crop catalogue", body = CropListApiResponse))
)]
#[get("/crops")]
pub async fn list_crops(state: web::Data<AppState>) -> HttpResponse {
    let custom = state.repo.lock().await.load_custom_crops();
    let crops = merge_catalogue(&custom)
        .into_iter()
        .map(crop_response)
        .collect();
    HttpResponse::Ok().json(ApiResponse::new(CropListResponse { crops }, collection_links()))
}

/// POST /api/crops
/// Adds a custom crop.
#[utoipa::path(
    post,
    path = "/api/crops",
    tag = "crops",
    request_body = NewCropRequest,
    responses(
        (status = 201, description = "Custom crop created", body = CropApiResponse),
        (status = 400, description = "Blank name", body = ErrorResponse),
    )
)]
#[post("/crops")]
pub async fn post_crop(
    state: web::Data<AppState>,
    body: web::Json<NewCropRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Crop name must not be empty.".into()));
    }

    let mut repo = state.repo.lock().await;
    let mut custom = repo.load_custom_crops();
    let mut stamp = Utc::now().timestamp_millis();
    while custom.iter().any(|c| c.id == format!("custom_{stamp}")) {
        stamp += 1;
    }
    let crop = Crop {
        is_custom: true,
        ..Crop::new(format!("custom_{stamp}"), name, request.color.trim())
    };
    custom.push(crop.clone());
    repo.save_custom_crops(&custom)?;
    info!("Added custom crop '{}' ({})", crop.name, crop.id);

    let mut links = collection_links();
    links.insert(
        "delete".into(),
        link(format!("/api/crops/{}", crop.id), Method::DELETE),
    );
    Ok(HttpResponse::Created().json(ApiResponse::new(crop_response(crop), links)))
}

/// DELETE /api/crops/{id}
/// Removes a custom crop. Plots already planted with it keep their copy.
#[utoipa::path(
    delete,
    path = "/api/crops/{id}",
    tag = "crops",
    params(("id" = String, Path, description = "Custom crop id")),
    responses(
        (status = 204, description = "Crop removed"),
        (status = 400, description = "Built-in crops cannot be removed", body = ErrorResponse),
        (status = 404, description = "Unknown crop", body = ErrorResponse),
    )
)]
#[delete("/crops/{id}")]
pub async fn delete_crop(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if is_built_in(&id) {
        return Err(ApiError::BadRequest(format!(
            "Built-in crop '{id}' cannot be removed."
        )));
    }

    let mut repo = state.repo.lock().await;
    let custom = repo.load_custom_crops();
    if !custom.iter().any(|c| c.id == id) {
        return Err(ApiError::crop_not_found(id));
    }
    let remaining: Vec<Crop> = custom.into_iter().filter(|c| c.id != id).collect();
    repo.save_custom_crops(&remaining)?;
    info!("Removed custom crop '{id}'");
    Ok(HttpResponse::NoContent().finish())
}
