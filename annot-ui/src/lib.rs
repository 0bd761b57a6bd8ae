//! annot-ui library - annotation web service
//!
//! Exposes the router and application state for the binary and for
//! integration testing.

use annot_common::Session;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod render;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
///
/// The session lock serializes annotator events: each handler runs its
/// transition to completion before the next one observes the store.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages and form actions)
        .merge(api::ui_routes())
        .merge(api::session_routes())
        .merge(api::export_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
