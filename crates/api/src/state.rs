use std::sync::Arc;

use sketchform_canvas::DrawingBoard;
use sketchform_events::{EventBus, NotificationLog};
use sketchform_regions::RegionCache;
use sketchform_store::{FormBinding, RecordStore};
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Record list and the edit form bound to it. Locked together so a submit
/// sees the same list the edit was started on.
pub struct RecordDesk {
    pub store: RecordStore,
    pub binding: FormBinding,
}

impl RecordDesk {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            binding: FormBinding::new(),
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every component sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Province and city/regency cache.
    pub regions: Arc<RegionCache>,
    pub board: Arc<Mutex<DrawingBoard>>,
    pub records: Arc<Mutex<RecordDesk>>,
    /// Centralized bus for user-facing notifications.
    pub event_bus: Arc<EventBus>,
    pub notifications: Arc<NotificationLog>,
}
