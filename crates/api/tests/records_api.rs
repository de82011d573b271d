//! Integration tests for the positional record endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, empty, get, json, record_payload};
use sketchform_core::notification::Severity;

async fn create(test: &common::TestApp, name: &str) {
    let response = json(test.app(), Method::POST, "/api/v1/records", record_payload(name)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn names(test: &common::TestApp) -> Vec<String> {
    let json = body_json(get(test.app(), "/api/v1/records").await).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_resolves_region_names() {
    let test = common::build_test_app().await;
    let response = json(test.app(), Method::POST, "/api/v1/records", record_payload("  Siti  ")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["index"], 0);
    assert_eq!(json["data"]["record"]["name"], "Siti");
    assert_eq!(json["data"]["record"]["regionName"], "JAWA BARAT");
    // not cached yet, so the client-supplied name is kept
    assert_eq!(json["data"]["record"]["subRegionName"], "KOTA BANDUNG");
    assert_eq!(json["data"]["record"]["gender"], "Perempuan");
}

#[tokio::test]
async fn delete_then_update_by_position() {
    let test = common::build_test_app().await;
    for name in ["A1", "B1", "C1"] {
        create(&test, name).await;
    }

    let response = empty(test.app(), Method::DELETE, "/api/v1/records/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(names(&test).await, ["A1", "C1"]);

    let response = json(test.app(), Method::PUT, "/api/v1/records/1", record_payload("X1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&test).await, ["A1", "X1"]);
}

#[tokio::test]
async fn out_of_range_index_returns_404() {
    let test = common::build_test_app().await;
    create(&test, "A1").await;

    for response in [
        get(test.app(), "/api/v1/records/3").await,
        empty(test.app(), Method::DELETE, "/api/v1/records/3").await,
        json(test.app(), Method::PUT, "/api/v1/records/3", record_payload("X1")).await,
    ] {
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "OUT_OF_BOUNDS");
    }
    assert_eq!(names(&test).await, ["A1"]);
}

#[tokio::test]
async fn out_of_range_mutations_publish_one_error_notice_each() {
    let test = common::build_test_app().await;
    create(&test, "A1").await;
    let mut rx = test.state.event_bus.subscribe();

    get(test.app(), "/api/v1/records/3").await;
    assert!(rx.try_recv().is_err());

    empty(test.app(), Method::DELETE, "/api/v1/records/3").await;
    json(test.app(), Method::PUT, "/api/v1/records/3", record_payload("X1")).await;

    for _ in 0..2 {
        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert!(notice.message.contains("out of bounds"));
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let test = common::build_test_app().await;
    let mut payload = record_payload("A");
    payload["age"] = serde_json::json!(130);

    let response = json(test.app(), Method::POST, "/api/v1/records", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(names(&test).await.is_empty());
}

#[tokio::test]
async fn mutations_publish_one_success_notice_each() {
    let test = common::build_test_app().await;
    let mut rx = test.state.event_bus.subscribe();

    create(&test, "A1").await;
    json(test.app(), Method::PUT, "/api/v1/records/0", record_payload("B1")).await;
    empty(test.app(), Method::DELETE, "/api/v1/records/0").await;

    let messages: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|n| {
            assert_eq!(n.severity, Severity::Success);
            n.message
        })
        .collect();
    assert_eq!(messages, ["Record added", "Record updated", "Record deleted"]);
}

#[tokio::test]
async fn update_keeps_record_id() {
    let test = common::build_test_app().await;
    create(&test, "A1").await;
    let before = body_json(get(test.app(), "/api/v1/records/0").await).await;

    let after = body_json(json(test.app(), Method::PUT, "/api/v1/records/0", record_payload("B1")).await).await;
    assert_eq!(after["data"]["record"]["id"], before["data"]["record"]["id"]);
    assert_eq!(after["data"]["record"]["name"], "B1");
}
