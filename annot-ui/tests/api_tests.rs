//! Integration tests for annot-ui HTTP endpoints
//!
//! Tests cover:
//! - Language picker, empty-language notice, task browser screens
//! - Score submission and completeness-gated navigation
//! - Export download
//! - Health and session snapshot endpoints

use annot_common::{FixtureSet, Session};
use annot_ui::{build_router, AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

const FRENCH: &str = r#"[
  {"data": {
    "dialogues": ["A: bonjour", "B: salut"],
    "profiles": [{"Name": "Alice", "Age": "30"}],
    "Relationships": [{"Alice": "motherOf", "Bob": "childOf"}]
  }},
  {"data": {"memory": "Second task"}}
]"#;

/// Test helper: router over in-memory fixtures
fn setup_app() -> Router {
    let fixtures = FixtureSet::new()
        .with_json("French", FRENCH)
        .unwrap()
        .with_json("Bengali", "[]")
        .unwrap();
    build_router(AppState::new(Session::new(fixtures)))
}

async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).expect("Should parse JSON")
}

async fn session_json(app: &Router) -> Value {
    body_json(get(app, "/api/session").await).await
}

// =============================================================================
// Screens
// =============================================================================

#[tokio::test]
async fn test_index_shows_language_picker() {
    let app = setup_app();
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Select a language"));
    assert!(html.contains(r#"value="French""#));
    assert!(html.contains(r#"value="Bengali""#));
}

#[tokio::test]
async fn test_empty_language_notice_and_go_back() {
    let app = setup_app();

    let response = post_form(&app, "/language", "language=Bengali").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("No tasks found for language: Bengali"));

    post_form(&app, "/back", "").await;
    assert_eq!(session_json(&app).await["state"], "no_language_selected");
}

#[tokio::test]
async fn test_task_browser_renders_relationship_triple() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("Task 1 / 2"));
    assert!(html.contains("Alice <strong>motherOf</strong> Bob"));
    assert!(html.contains("<h3>Alice</h3>"));
}

// =============================================================================
// Scoring and navigation
// =============================================================================

#[tokio::test]
async fn test_next_refused_until_task_complete() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;

    post_form(&app, "/next", "").await;
    let snapshot = session_json(&app).await;
    assert_eq!(snapshot["index"], 0);
    assert_eq!(snapshot["complete"], false);
    assert_eq!(
        snapshot["missing"],
        json!(["dialogues_overall", "profiles_0.Age", "Relationships"])
    );

    post_form(&app, "/score", "field=dialogues_overall&value=1").await;
    post_form(&app, "/score", "field=profiles_0&sub_field=Age&value=2").await;
    post_form(&app, "/score", "field=Relationships&value=0").await;
    assert_eq!(session_json(&app).await["can_go_next"], true);

    post_form(&app, "/next", "").await;
    let snapshot = session_json(&app).await;
    assert_eq!(snapshot["index"], 1);
    assert_eq!(snapshot["missing"], json!(["memory"]));

    post_form(&app, "/previous", "").await;
    assert_eq!(session_json(&app).await["index"], 0);
}

#[tokio::test]
async fn test_empty_value_resets_score() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;

    post_form(&app, "/score", "field=Relationships&value=1").await;
    post_form(&app, "/score", "field=Relationships&value=").await;

    let missing = session_json(&app).await["missing"].clone();
    assert!(missing.as_array().unwrap().contains(&json!("Relationships")));
}

#[tokio::test]
async fn test_score_without_field_is_bad_request() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;

    let response = post_form(&app, "/score", "field=&value=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refused_action_redirects_to_current_screen() {
    let app = setup_app();

    // no language selected yet
    let response = post_form(&app, "/next", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(session_json(&app).await["state"], "no_language_selected");
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_downloads_score_document() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;
    post_form(&app, "/score", "field=dialogues_overall&value=1").await;
    post_form(&app, "/score", "field=profiles_0&sub_field=Age&value=2").await;

    let response = get(&app, "/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"scores-French.json\""
    );

    let document = body_json(response).await;
    assert_eq!(
        document,
        json!({"0": {"dialogues_overall": "1", "profiles_0": {"Age": "2"}}})
    );
}

#[tokio::test]
async fn test_export_with_no_scores_is_empty_object() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;

    let response = get(&app, "/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "{}");
}

#[tokio::test]
async fn test_export_outside_browsing_is_conflict() {
    let app = setup_app();
    let response = get(&app, "/export").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_change_language_then_reselect_resets_scores() {
    let app = setup_app();
    post_form(&app, "/language", "language=French").await;
    post_form(&app, "/score", "field=dialogues_overall&value=2").await;

    post_form(&app, "/change-language", "").await;
    post_form(&app, "/language", "language=French").await;

    let response = get(&app, "/export").await;
    assert_eq!(body_text(response).await, "{}");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "annot-ui");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_stylesheet_served() {
    let app = setup_app();
    let response = get(&app, "/static/annotator.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
}
