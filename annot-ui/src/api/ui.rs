//! UI serving routes
//!
//! Renders the current screen server-side and serves the stylesheet

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::render::render_page;
use crate::AppState;

const ANNOTATOR_CSS: &str = include_str!("../../static/annotator.css");

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_index))
        .route("/static/annotator.css", get(serve_annotator_css))
}

/// GET /
///
/// Language picker, empty-language notice or task browser, depending on
/// the session state
pub async fn serve_index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.read().await;
    Html(render_page(&session))
}

/// GET /static/annotator.css
pub async fn serve_annotator_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        ANNOTATOR_CSS,
    )
        .into_response()
}
