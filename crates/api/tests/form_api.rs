//! Integration tests for the edit-form binding endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, empty, get, json, record_payload};
use sketchform_core::notification::Severity;

async fn submit(test: &common::TestApp, name: &str) -> serde_json::Value {
    let response = json(test.app(), Method::POST, "/api/v1/form/submit", record_payload(name)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn idle_submit_creates_records() {
    let test = common::build_test_app().await;

    let json = submit(&test, "A1").await;
    assert_eq!(json["data"]["outcome"]["action"], "created");
    assert_eq!(json["data"]["outcome"]["index"], 0);

    let form = body_json(get(test.app(), "/api/v1/form").await).await;
    assert_eq!(form["data"]["state"]["mode"], "idle");
    assert!(form["data"]["record"].is_null());
}

#[tokio::test]
async fn edit_then_submit_updates_in_place() {
    let test = common::build_test_app().await;
    submit(&test, "A1").await;
    submit(&test, "B1").await;

    let response = empty(test.app(), Method::POST, "/api/v1/form/edit/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let form = body_json(response).await;
    assert_eq!(form["data"]["state"]["mode"], "editing");
    assert_eq!(form["data"]["record"]["name"], "B1");

    let json = submit(&test, "B2").await;
    assert_eq!(json["data"]["outcome"]["action"], "updated");
    assert_eq!(json["data"]["outcome"]["index"], 1);
    assert_eq!(json["data"]["record"]["name"], "B2");

    let list = body_json(get(test.app(), "/api/v1/records").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cancel_returns_to_idle() {
    let test = common::build_test_app().await;
    submit(&test, "A1").await;
    empty(test.app(), Method::POST, "/api/v1/form/edit/0").await;

    let form = body_json(empty(test.app(), Method::DELETE, "/api/v1/form/edit").await).await;
    assert_eq!(form["data"]["state"]["mode"], "idle");

    let json = submit(&test, "B1").await;
    assert_eq!(json["data"]["outcome"]["action"], "created");
}

#[tokio::test]
async fn submitting_edit_of_deleted_record_fails() {
    let test = common::build_test_app().await;
    submit(&test, "A1").await;
    empty(test.app(), Method::POST, "/api/v1/form/edit/0").await;
    empty(test.app(), Method::DELETE, "/api/v1/records/0").await;

    let response = json(test.app(), Method::POST, "/api/v1/form/submit", record_payload("X1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let form = body_json(get(test.app(), "/api/v1/form").await).await;
    assert_eq!(form["data"]["state"]["mode"], "idle");
}

#[tokio::test]
async fn editing_missing_index_returns_404() {
    let test = common::build_test_app().await;
    let mut rx = test.state.event_bus.subscribe();
    let response = empty(test.app(), Method::POST, "/api/v1/form/edit/0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(rx.try_recv().unwrap().severity, Severity::Error);
    assert!(rx.try_recv().is_err());
}
