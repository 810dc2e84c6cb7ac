use std::collections::{HashMap, HashSet};

use actix_web::http::Method;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};

use crate::logic::{boundary::HiddenBorders, merge::MergeOutcome};
use crate::models::{
    crop::{Crop, CropStatus},
    farm::{ActivityLog, Direction, Farm, LogType},
    Matrix,
};
use crate::storage::FarmKey;

/// Serde adapter for `actix_web::http::Method` (serialises as its uppercase string).
mod method_serde {
    use actix_web::http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Method, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Method, D::Error> {
        let s = String::deserialize(d)?;
        Method::from_bytes(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// A single HAL-style hyperlink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
    #[serde(with = "method_serde")]
    #[schema(value_type = String, example = "GET")]
    pub method: Method,
}

/// Map of relation name → link, serialised as the `_links` field in responses.
pub type Links = HashMap<String, Link>;

/// Helper to build a `Link` from an href and an HTTP method.
pub fn link(href: impl Into<String>, method: Method) -> Link {
    Link {
        href: href.into(),
        method,
    }
}

/// Links shared by every response about one farm.
pub fn farm_links(key: FarmKey) -> Links {
    let base = format!("/api/farms/{}", key.as_str());
    let mut links = Links::new();
    links.insert("self".into(), link(base.clone(), Method::GET));
    links.insert("grid".into(), link(format!("{base}/grid"), Method::GET));
    links.insert("merge".into(), link(format!("{base}/merge"), Method::POST));
    links.insert("reset".into(), link(format!("{base}/reset"), Method::POST));
    links.insert("logs".into(), link(format!("{base}/logs"), Method::GET));
    links
}

/// Generic single-item response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(
    FarmListApiResponse = ApiResponse<FarmListResponse>,
    FarmApiResponse = ApiResponse<FarmResponse>,
    GridApiResponse = ApiResponse<GridResponse>,
    MergeApiResponse = ApiResponse<MergeResponse>,
    LogListApiResponse = ApiResponse<LogListResponse>,
    LogApiResponse = ApiResponse<ActivityLog>,
    CropListApiResponse = ApiResponse<CropListResponse>,
    CropApiResponse = ApiResponse<CropResponse>,
)]
pub struct ApiResponse<T> {
    pub payload: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> ApiResponse<T> {
    pub fn new(payload: T, links: Links) -> Self {
        Self {
            payload,
            errors: vec![],
            links,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Plot ids picked by the user in merge or reset mode.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub plot_ids: Vec<String>,
}

impl SelectionRequest {
    pub fn selection(&self) -> HashSet<String> {
        self.plot_ids.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlotRequest {
    /// Crop to plant; `null` clears the plot.
    pub crop_id: Option<String>,
    pub variety: Option<String>,
    pub status: CropStatus,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DirectionRequest {
    pub direction: Direction,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLogRequest {
    pub plot_id: String,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: LogType,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCropRequest {
    pub name: String,
    pub color: String,
}

/// `?selected=a,b,c` previews merge-mode borders for a pending selection.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GridQuery {
    /// Comma-separated plot ids.
    pub selected: Option<String>,
}

impl GridQuery {
    pub fn selection(&self) -> Option<HashSet<String>> {
        self.selected.as_ref().map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmSummary {
    pub key: FarmKey,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmListResponse {
    pub farms: Vec<FarmSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmResponse {
    pub key: FarmKey,
    pub farm: Farm,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MergeResponse {
    pub outcome: MergeOutcome,
    pub farm: Farm,
}

/// One rendered grid cell.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub id: String,
    pub row: usize,
    pub col: usize,
    /// For a merge member, the head's crop.
    pub crop: Option<Crop>,
    pub status: CropStatus,
    pub planted_date: Option<NaiveDate>,
    pub days_since_planted: Option<i64>,
    pub last_watering: Option<NaiveDate>,
    /// Head id of the merge group this cell belongs to.
    pub group_id: Option<String>,
    pub is_merge_start: bool,
    pub merge_count: Option<usize>,
    pub hidden_borders: HiddenBorders,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub key: FarmKey,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub direction: Direction,
    #[schema(value_type = Vec<Vec<GridCell>>)]
    pub grid: Matrix<GridCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogListResponse {
    pub logs: Vec<ActivityLog>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CropResponse {
    #[serde(flatten)]
    pub crop: Crop,
    pub guide_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CropListResponse {
    pub crops: Vec<CropResponse>,
}
