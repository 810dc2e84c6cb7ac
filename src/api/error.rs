use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::error::StorageError;
use crate::models::request::ErrorResponse;

/// Errors surfaced by the HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{kind} '{id}' not found.")]
    NotFound { kind: &'static str, id: String },

    #[error("Could not save changes: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn plot_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Plot",
            id: id.into(),
        }
    }

    pub fn crop_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Crop",
            id: id.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(e) = self {
            error!("Storage failure: {e}");
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
