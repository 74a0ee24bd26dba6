/// Shared application state
use crate::jobs::ReleaseScheduler;
use cadence_core::CatalogStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub scheduler: Arc<ReleaseScheduler>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogStore>, scheduler: Arc<ReleaseScheduler>) -> Self {
        Self { catalog, scheduler }
    }
}
