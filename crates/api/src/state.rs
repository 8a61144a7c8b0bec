use std::sync::Arc;

use argus_events::EventBus;
use argus_session::SessionManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: argus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Session engine: owns every live inspection session.
    pub manager: Arc<SessionManager>,
    /// Event bus the WebSocket stream subscribes to.
    pub bus: Arc<EventBus>,
}
