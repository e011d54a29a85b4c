use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: launchpad_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Lifecycle handlers publish here after a successful write.
    pub event_bus: Arc<launchpad_events::EventBus>,
}
