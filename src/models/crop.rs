use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CropStatus {
    Planted,
    Harvest,
    #[default]
    Empty,
}

impl CropStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CropStatus::Planted => "planted",
            CropStatus::Harvest => "ready for harvest",
            CropStatus::Empty => "empty",
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: String,
    pub name: String,
    /// CSS hex colour used to paint the plot.
    pub color: String,
    /// Cultivar label, e.g. "Momotaro" for a tomato.
    pub variety: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
}

impl Crop {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            variety: None,
            is_custom: false,
        }
    }

    /// Returns a copy of this crop carrying the given variety (blank labels are dropped).
    pub fn with_variety(mut self, variety: Option<String>) -> Self {
        self.variety = variety
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        self
    }
}
