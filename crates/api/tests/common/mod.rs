#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use sketchform_api::config::ServerConfig;
use sketchform_api::router::build_app_router;
use sketchform_api::state::{AppState, RecordDesk};
use sketchform_canvas::{DrawingBoard, StrokeRenderer};
use sketchform_core::region::{Region, SubRegion};
use sketchform_events::{EventBus, NotificationLog};
use sketchform_regions::{RegionCache, RegionFetchError, RegionSource};
use sketchform_store::{MemoryBlobStore, RecordStore};

/// Region source serving a fixed pair of provinces.
pub struct StaticRegionSource {
    pub online: bool,
}

#[async_trait]
impl RegionSource for StaticRegionSource {
    async fn fetch_regions(&self) -> Result<Vec<Region>, RegionFetchError> {
        if !self.online {
            return Err(RegionFetchError::Status {
                status: 503,
                body: String::new(),
            });
        }
        Ok(vec![
            Region::new("32", "JAWA BARAT"),
            Region::new("11", "ACEH"),
        ])
    }

    async fn fetch_sub_regions(&self, region_id: &str) -> Result<Vec<SubRegion>, RegionFetchError> {
        let table: HashMap<&str, Vec<SubRegion>> = [(
            "32",
            vec![
                Region::new("3273", "KOTA BANDUNG"),
                Region::new("3201", "KABUPATEN BOGOR"),
            ],
        )]
        .into_iter()
        .collect();

        match table.get(region_id) {
            Some(list) if self.online => Ok(list.clone()),
            _ => Err(RegionFetchError::Status {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Everything a test needs: the router plus handles into its state.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        region_api_base_url: "http://127.0.0.1:9".to_string(),
        region_fetch_timeout_ms: 500,
        data_dir: upload_dir.join("data"),
        records_key: "records".to_string(),
        history_limit: 20,
        canvas_width: 64,
        canvas_height: 48,
        upload_dir: upload_dir.to_path_buf(),
        upload_max_bytes: 1024,
        notification_log_capacity: 50,
    }
}

/// Build the full application router with in-memory collaborators.
///
/// Provinces are loaded before returning; `online = false` exercises the
/// offline fallback.
pub async fn build_test_app_with(online: bool) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("temp dir");
    let config = test_config(upload_dir.path());

    let event_bus = Arc::new(EventBus::default());
    let regions = Arc::new(RegionCache::new(
        Arc::new(StaticRegionSource { online }),
        Duration::from_millis(config.region_fetch_timeout_ms),
        Arc::clone(&event_bus),
    ));
    regions.load_regions().await;

    let store = RecordStore::new(Arc::new(MemoryBlobStore::new()), config.records_key.clone());
    let board = DrawingBoard::with_renderer(
        config.canvas_width,
        config.canvas_height,
        config.history_limit,
        StrokeRenderer::seeded(42),
    )
    .expect("canvas");

    let state = AppState {
        config: Arc::new(config.clone()),
        regions,
        board: Arc::new(Mutex::new(board)),
        records: Arc::new(Mutex::new(RecordDesk::new(store))),
        event_bus,
        notifications: Arc::new(NotificationLog::new(config.notification_log_capacity)),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        upload_dir,
    }
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(true).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn empty(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// A valid record payload for the given name.
pub fn record_payload(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "age": 27,
        "regionId": "32",
        "subRegionId": "3273",
        "subRegionName": "KOTA BANDUNG",
        "gender": "Perempuan",
        "interests": ["Membaca", "Olahraga"],
        "message": "Halo"
    })
}
