//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use classroom_api::config::BusMode;
use classroom_api::state::{AppState, EventBus};
use classroom_messagebus::AsyncBusConfig;
use classroom_test_support::FixedClock;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build the full app over fresh in-memory state with a fixed clock.
pub fn build_test_app(mode: BusMode) -> (Router, AppState) {
    let bus = EventBus::new(mode, AsyncBusConfig::default());
    let app_state = AppState::new(Arc::new(FixedClock::default()), bus);
    (classroom_api::app(app_state.clone()), app_state)
}

/// Build the app with a synchronous bus, so reads see every accepted command.
pub fn build_sync_app() -> Router {
    build_test_app(BusMode::Sync).0
}

/// Send a POST request with a JSON body and return status, `Location` header and body.
pub async fn post_json_with_location(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, Option<String>, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_owned());
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, location, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, _, json) = post_json_with_location(app, uri, body).await;
    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Schedule a class and return its id.
pub async fn schedule_class(app: &Router, title: &str, date: &str, size: i32) -> String {
    let (status, json) = post_json(
        app.clone(),
        "/classes/schedule_new",
        &serde_json::json!({ "title": title, "date": date, "size": size }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED, "schedule failed: {json}");
    json["class_id"].as_str().unwrap().to_owned()
}

/// Register a student and return its id.
pub async fn register_student(app: &Router, email: &str, full_name: &str) -> String {
    let (status, json) = post_json(
        app.clone(),
        "/students/register",
        &serde_json::json!({ "email": email, "full_name": full_name }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED, "register failed: {json}");
    json["student_id"].as_str().unwrap().to_owned()
}
