//! Integration tests running the API over the asynchronous bus.

mod common;

use axum::http::StatusCode;
use classroom_api::config::BusMode;
use classroom_test_support::eventually;
use serde_json::json;

#[tokio::test]
async fn test_read_models_catch_up_with_accepted_commands() {
    let (app, state) = common::build_test_app(BusMode::Async);
    let class_id = common::schedule_class(&app, "Event Sourcing 101", "2026-03-02", 2).await;
    let ada = common::register_student(&app, "ada@example.com", "Ada Lovelace").await;

    // Each projection sees events in publication order, so the class projection
    // has the student contacts before it sees the enrollment.
    let (status, _) = common::post_json(
        app.clone(),
        &format!("/classes/{class_id}/enroll_student"),
        &json!({ "student_id": ada, "class_version": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let details = eventually(|| {
        let app = app.clone();
        let uri = format!("/classes/{class_id}");
        async move {
            let (status, details) = common::get_json(app, &uri).await;
            (status == StatusCode::OK && details["version"] == 1).then_some(details)
        }
    })
    .await;
    assert_eq!(details["available_spots"], 1);
    assert_eq!(details["students"][0]["contact"], "ada@example.com");

    state.bus.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_once_index_has_drained() {
    let (app, state) = common::build_test_app(BusMode::Async);
    common::register_student(&app, "ada@example.com", "Ada Lovelace").await;
    state.bus.shutdown().await;

    let (status, json) = common::post_json(
        app,
        "/students/register",
        &json!({ "email": "ada@example.com", "full_name": "Ada King" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "email_already_in_use");
}
