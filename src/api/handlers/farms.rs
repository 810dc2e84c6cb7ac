use std::collections::HashSet;

use actix_web::{get, http::Method, post, put, web, HttpResponse};
use chrono::{Local, NaiveDate};
use log::warn;

use crate::{
    api::{error::ApiError, AppState},
    data::crops::{find_crop, merge_catalogue},
    logic::{
        activity::{days_since, last_watering},
        boundary::hidden_borders,
        cultivation::{reset, set_crop_and_status, set_direction},
        merge::{merge, unmerge, MergeOutcome, MIN_MERGE_SIZE},
    },
    models::{
        farm::Farm,
        request::{
            farm_links, link, ApiResponse, DirectionRequest, ErrorResponse, FarmApiResponse,
            FarmListApiResponse, FarmListResponse, FarmResponse, FarmSummary, GridApiResponse,
            GridCell, GridQuery, GridResponse, Links, MergeApiResponse, MergeResponse,
            SelectionRequest, UpdatePlotRequest,
        },
    },
    storage::FarmKey,
};

fn farm_ok(key: FarmKey, farm: Farm) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(FarmResponse { key, farm }, farm_links(key)))
}

/// Renders the farm row by row, computing hidden borders fresh for every cell.
pub fn render_grid(
    key: FarmKey,
    farm: &Farm,
    selection: Option<&HashSet<String>>,
    today: NaiveDate,
) -> GridResponse {
    let grid = (0..farm.rows)
        .map(|row| {
            (0..farm.cols)
                .filter_map(|col| farm.plot_at(row, col))
                .map(|plot| {
                    let crop = match &plot.merged_with {
                        Some(head) => farm.plot(head).and_then(|h| h.crop.clone()),
                        None => plot.crop.clone(),
                    };
                    GridCell {
                        id: plot.id.clone(),
                        row: plot.row,
                        col: plot.col,
                        crop,
                        status: plot.status,
                        planted_date: plot.planted_date,
                        days_since_planted: plot.planted_date.map(|d| days_since(d, today)),
                        last_watering: last_watering(farm, &plot.id),
                        group_id: plot.group_id().map(String::from),
                        is_merge_start: plot.is_merge_start,
                        merge_count: plot.merge_count,
                        hidden_borders: hidden_borders(farm, plot, selection),
                    }
                })
                .collect()
        })
        .collect();

    GridResponse {
        key,
        name: farm.name.clone(),
        rows: farm.rows,
        cols: farm.cols,
        direction: farm.direction,
        grid,
    }
}

/// GET /api/farms
/// Lists the tracked farms.
#[utoipa::path(
    get,
    path = "/api/farms",
    tag = "farms",
    responses((status = 200, description = "Tracked farms", body = FarmListApiResponse))
)]
#[get("/farms")]
pub async fn list_farms(state: web::Data<AppState>) -> HttpResponse {
    let repo = state.repo.lock().await;
    let farms = FarmKey::ALL
        .iter()
        .map(|key| {
            let farm = repo.load(*key);
            FarmSummary {
                key: *key,
                name: farm.name,
                rows: farm.rows,
                cols: farm.cols,
            }
        })
        .collect();

    let mut links = Links::new();
    links.insert("self".into(), link("/api/farms", Method::GET));
    for key in FarmKey::ALL {
        links.insert(
            key.as_str().into(),
            link(format!("/api/farms/{}", key.as_str()), Method::GET),
        );
    }
    HttpResponse::Ok().json(ApiResponse::new(FarmListResponse { farms }, links))
}

/// GET /api/farms/{key}
#[utoipa::path(
    get,
    path = "/api/farms/{key}",
    tag = "farms",
    params(("key" = String, Path, description = "Farm key: `sfc` or `field-yu`")),
    responses((status = 200, description = "Full farm state", body = FarmApiResponse))
)]
#[get("/farms/{key}")]
pub async fn get_farm(state: web::Data<AppState>, path: web::Path<FarmKey>) -> HttpResponse {
    let key = path.into_inner();
    let farm = state.repo.lock().await.load(key);
    farm_ok(key, farm)
}

/// GET /api/farms/{key}/grid
/// Returns render-ready cells, including which borders to hide for merged plots.
#[utoipa::path(
    get,
    path = "/api/farms/{key}/grid",
    tag = "farms",
    params(("key" = String, Path, description = "Farm key"), GridQuery),
    responses((status = 200, description = "Rendered grid", body = GridApiResponse))
)]
#[get("/farms/{key}/grid")]
pub async fn get_grid(
    state: web::Data<AppState>,
    path: web::Path<FarmKey>,
    query: web::Query<GridQuery>,
) -> HttpResponse {
    let key = path.into_inner();
    let farm = state.repo.lock().await.load(key);
    let selection = query.selection();
    let grid = render_grid(key, &farm, selection.as_ref(), Local::now().date_naive());
    HttpResponse::Ok().json(ApiResponse::new(grid, farm_links(key)))
}

/// PUT /api/farms/{key}/plots/{id}
/// Sets crop and status; a merge head passes its status on to the whole group.
#[utoipa::path(
    put,
    path = "/api/farms/{key}/plots/{id}",
    tag = "plots",
    params(
        ("key" = String, Path, description = "Farm key"),
        ("id" = String, Path, description = "Plot id"),
    ),
    request_body = UpdatePlotRequest,
    responses(
        (status = 200, description = "Plot updated", body = FarmApiResponse),
        (status = 404, description = "Unknown plot or crop", body = ErrorResponse),
    )
)]
#[put("/farms/{key}/plots/{id}")]
pub async fn put_plot(
    state: web::Data<AppState>,
    path: web::Path<(FarmKey, String)>,
    body: web::Json<UpdatePlotRequest>,
) -> Result<HttpResponse, ApiError> {
    let (key, plot_id) = path.into_inner();
    let request = body.into_inner();
    let mut repo = state.repo.lock().await;
    let farm = repo.load(key);

    if !farm.contains(&plot_id) {
        return Err(ApiError::plot_not_found(plot_id));
    }
    let crop = match &request.crop_id {
        Some(crop_id) => {
            let catalogue = merge_catalogue(&repo.load_custom_crops());
            let crop = find_crop(&catalogue, crop_id)
                .cloned()
                .ok_or_else(|| ApiError::crop_not_found(crop_id.clone()))?;
            Some(crop.with_variety(request.variety.clone()))
        }
        None => None,
    };

    let updated = set_crop_and_status(&farm, &plot_id, crop, request.status);
    repo.save(key, &updated)?;
    Ok(farm_ok(key, updated))
}

/// POST /api/farms/{key}/merge
/// Merges the connected part of the selection into one plot.
#[utoipa::path(
    post,
    path = "/api/farms/{key}/merge",
    tag = "plots",
    params(("key" = String, Path, description = "Farm key")),
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Plots merged", body = MergeApiResponse),
        (status = 400, description = "Fewer than two adjacent plots selected", body = ErrorResponse),
    )
)]
#[post("/farms/{key}/merge")]
pub async fn post_merge(
    state: web::Data<AppState>,
    path: web::Path<FarmKey>,
    body: web::Json<SelectionRequest>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let selection = body.selection();
    if selection.len() < MIN_MERGE_SIZE {
        return Err(ApiError::BadRequest(
            "Select at least two plots to merge.".into(),
        ));
    }

    let mut repo = state.repo.lock().await;
    let farm = repo.load(key);
    let (merged, outcome) = merge(&farm, &selection);
    if outcome == MergeOutcome::InsufficientAdjacency {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Select two or more plots that are next to each other.",
            "outcome": outcome,
        })));
    }

    repo.save(key, &merged)?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        MergeResponse {
            outcome,
            farm: merged,
        },
        farm_links(key),
    )))
}

/// POST /api/farms/{key}/plots/{id}/unmerge
/// Splits a merged plot back into independent plots. A no-op for plots that are not merge heads.
#[utoipa::path(
    post,
    path = "/api/farms/{key}/plots/{id}/unmerge",
    tag = "plots",
    params(
        ("key" = String, Path, description = "Farm key"),
        ("id" = String, Path, description = "Head plot id"),
    ),
    responses(
        (status = 200, description = "Group dissolved", body = FarmApiResponse),
        (status = 404, description = "Unknown plot", body = ErrorResponse),
    )
)]
#[post("/farms/{key}/plots/{id}/unmerge")]
pub async fn post_unmerge(
    state: web::Data<AppState>,
    path: web::Path<(FarmKey, String)>,
) -> Result<HttpResponse, ApiError> {
    let (key, head_id) = path.into_inner();
    let mut repo = state.repo.lock().await;
    let farm = repo.load(key);
    if !farm.contains(&head_id) {
        return Err(ApiError::plot_not_found(head_id));
    }

    let updated = unmerge(&farm, &head_id);
    if updated != farm {
        repo.save(key, &updated)?;
    }
    Ok(farm_ok(key, updated))
}

/// POST /api/farms/{key}/reset
/// Blanks the selected plots and dissolves any group they head.
#[utoipa::path(
    post,
    path = "/api/farms/{key}/reset",
    tag = "plots",
    params(("key" = String, Path, description = "Farm key")),
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Plots reset", body = FarmApiResponse),
        (status = 400, description = "Empty selection", body = ErrorResponse),
    )
)]
#[post("/farms/{key}/reset")]
pub async fn post_reset(
    state: web::Data<AppState>,
    path: web::Path<FarmKey>,
    body: web::Json<SelectionRequest>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let selection = body.selection();
    if selection.is_empty() {
        return Err(ApiError::BadRequest("Select at least one plot to reset.".into()));
    }

    let mut repo = state.repo.lock().await;
    let farm = repo.load(key);
    let unknown = selection.iter().filter(|id| !farm.contains(id)).count();
    if unknown > 0 {
        warn!("Reset on '{}' ignores {unknown} unknown plot id(s)", key.as_str());
    }
    let updated = reset(&farm, &selection);
    repo.save(key, &updated)?;
    Ok(farm_ok(key, updated))
}

/// PUT /api/farms/{key}/direction
#[utoipa::path(
    put,
    path = "/api/farms/{key}/direction",
    tag = "farms",
    params(("key" = String, Path, description = "Farm key")),
    request_body = DirectionRequest,
    responses((status = 200, description = "Direction updated", body = FarmApiResponse))
)]
#[put("/farms/{key}/direction")]
pub async fn put_direction(
    state: web::Data<AppState>,
    path: web::Path<FarmKey>,
    body: web::Json<DirectionRequest>,
) -> Result<HttpResponse, ApiError> {
    let key = path.into_inner();
    let mut repo = state.repo.lock().await;
    let updated = set_direction(&repo.load(key), body.direction);
    repo.save(key, &updated)?;
    Ok(farm_ok(key, updated))
}
