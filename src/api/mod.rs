use tokio::sync::Mutex;

use crate::storage::{BlobStore, FarmRepository};

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;

/// Shared handler state. The mutex serialises every load → change → save cycle.
pub struct AppState {
    pub repo: Mutex<FarmRepository>,
}

impl AppState {
    pub fn new(store: impl BlobStore + 'static) -> Self {
        Self {
            repo: Mutex::new(FarmRepository::new(store)),
        }
    }
}
