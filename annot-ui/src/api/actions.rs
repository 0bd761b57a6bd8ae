//! Session actions
//!
//! Form posts from the annotation page. Every action redirects back to `/`;
//! an action the session refuses in its current state is logged and the
//! current screen is shown again.

use annot_common::{Score, SessionState};
use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ApiError, ApiResult, AppState};

/// Build session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/language", post(select_language))
        .route("/back", post(go_back))
        .route("/change-language", post(change_language))
        .route("/previous", post(previous))
        .route("/next", post(next))
        .route("/score", post(set_score))
        .route("/api/session", get(get_session))
}

#[derive(Debug, Deserialize)]
pub struct LanguageForm {
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreForm {
    pub field: String,
    #[serde(default)]
    pub sub_field: Option<String>,
    /// Empty value resets the score
    #[serde(default)]
    pub value: String,
}

fn back_to_page<T>(action: &str, result: annot_common::Result<T>) -> Redirect {
    if let Err(e) = result {
        warn!("{} refused: {}", action, e);
    }
    Redirect::to("/")
}

/// POST /language
pub async fn select_language(
    State(state): State<AppState>,
    Form(form): Form<LanguageForm>,
) -> Redirect {
    let mut session = state.session.write().await;
    back_to_page("select_language", session.select_language(&form.language))
}

/// POST /back
pub async fn go_back(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.write().await;
    back_to_page("go_back", session.go_back())
}

/// POST /change-language
pub async fn change_language(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.write().await;
    back_to_page("change_language", session.change_language())
}

/// POST /previous
pub async fn previous(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.write().await;
    back_to_page("previous", session.previous())
}

/// POST /next
///
/// Stays on the current task while it is incomplete or the last one
pub async fn next(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.write().await;
    back_to_page("next", session.next())
}

/// POST /score
///
/// Values are stored as submitted; the dropdown is what limits them to the
/// field's range.
pub async fn set_score(
    State(state): State<AppState>,
    Form(form): Form<ScoreForm>,
) -> ApiResult<Redirect> {
    if form.field.is_empty() {
        return Err(ApiError::BadRequest("field must not be empty".to_string()));
    }
    let sub_field = form.sub_field.as_deref().filter(|s| !s.is_empty());

    let mut session = state.session.write().await;
    Ok(back_to_page(
        "set_score",
        session.set_score(&form.field, sub_field, Score::parse(&form.value)),
    ))
}

/// Session snapshot response
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub state: &'static str,
    pub languages: Vec<String>,
    pub language: Option<String>,
    pub index: Option<usize>,
    pub total: Option<usize>,
    pub complete: Option<bool>,
    pub can_go_next: Option<bool>,
    pub missing: Vec<String>,
}

/// GET /api/session
///
/// Current state, position and missing score keys as JSON
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let session = state.session.read().await;

    let mut snapshot = SessionSnapshot {
        state: session.state().name(),
        languages: session.fixtures().languages().map(str::to_string).collect(),
        language: None,
        index: None,
        total: None,
        complete: None,
        can_go_next: None,
        missing: Vec::new(),
    };

    match session.state() {
        SessionState::NoLanguageSelected => {}
        SessionState::NoTasksForLanguage { language } => {
            snapshot.language = Some(language.clone());
            snapshot.total = Some(0);
        }
        SessionState::Browsing { .. } => {
            if let Some(current) = session.current() {
                snapshot.language = Some(current.language.to_string());
                snapshot.index = Some(current.index);
                snapshot.total = Some(current.total);
                snapshot.complete = Some(current.is_complete());
                snapshot.can_go_next = Some(current.can_go_next());
                snapshot.missing = current
                    .missing_fields()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
            }
        }
    }

    Json(snapshot)
}
