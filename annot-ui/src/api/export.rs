//! Score export
//!
//! Downloads the whole score store as `scores-<language>.json`

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{ApiResult, AppState};

/// Build export routes
pub fn export_routes() -> Router<AppState> {
    Router::new().route("/export", get(export_scores))
}

/// GET /export
///
/// Only available while browsing tasks (409 otherwise). An empty store
/// exports as `{}`.
pub async fn export_scores(State(state): State<AppState>) -> ApiResult<Response> {
    let session = state.session.read().await;
    let export = session.export()?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.body,
    )
        .into_response())
}
