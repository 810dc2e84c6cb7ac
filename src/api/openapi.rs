use utoipa::OpenApi;

use crate::{
    logic::{boundary::HiddenBorders, merge::MergeOutcome},
    models::{
        crop::{Crop, CropStatus},
        farm::{ActivityLog, Direction, Farm, LogType, Plot, Side},
        request::{
            CropApiResponse, CropListApiResponse, CropListResponse, CropResponse,
            DirectionRequest, ErrorResponse, FarmApiResponse, FarmListApiResponse,
            FarmListResponse, FarmResponse, FarmSummary, GridApiResponse, GridCell, GridResponse,
            Link, LogApiResponse, LogListApiResponse, LogListResponse, MergeApiResponse,
            MergeResponse, NewCropRequest, NewLogRequest, SelectionRequest, UpdatePlotRequest,
        },
        Coordinate,
    },
    storage::FarmKey,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Club Farm Dashboard API",
        description = "Track the club's farm plots: crops and status per plot, merging adjacent plots into beds, resetting plots, and keeping an activity log.",
        version = "1.0.0",
        license(name = "MIT"),
    ),
    paths(
        crate::api::handlers::farms::list_farms,
        crate::api::handlers::farms::get_farm,
        crate::api::handlers::farms::get_grid,
        crate::api::handlers::farms::put_plot,
        crate::api::handlers::farms::post_merge,
        crate::api::handlers::farms::post_unmerge,
        crate::api::handlers::farms::post_reset,
        crate::api::handlers::farms::put_direction,
        crate::api::handlers::logs::list_logs,
        crate::api::handlers::logs::post_log,
        crate::api::handlers::crops::list_crops,
        crate::api::handlers::crops::post_crop,
        crate::api::handlers::crops::delete_crop,
    ),
    components(
        schemas(
            // Enums
            CropStatus, Direction, LogType, Side, FarmKey, MergeOutcome,
            // Domain
            Coordinate, Crop, Plot, Farm, ActivityLog, HiddenBorders,
            // Requests
            SelectionRequest, UpdatePlotRequest, DirectionRequest, NewLogRequest, NewCropRequest,
            // Responses
            FarmSummary, FarmListResponse, FarmResponse, MergeResponse, GridCell, GridResponse,
            LogListResponse, CropResponse, CropListResponse,
            // Shared
            Link, ErrorResponse,
            // Concrete response envelopes (via #[aliases])
            FarmListApiResponse,
            FarmApiResponse,
            GridApiResponse,
            MergeApiResponse,
            LogListApiResponse,
            LogApiResponse,
            CropListApiResponse,
            CropApiResponse,
        )
    ),
    tags(
        (name = "farms", description = "Farm state, rendered grid and orientation"),
        (name = "plots", description = "Plot editing — crop/status, merge, unmerge, reset"),
        (name = "logs",  description = "Activity log — watering, thinning, fertilising, ..."),
        (name = "crops", description = "Crop catalogue — built-in and custom crops"),
    )
)]
pub struct ApiDoc;
