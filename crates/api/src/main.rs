use std::net::SocketAddr;
use std::sync::Arc;

use sketchform_canvas::DrawingBoard;
use sketchform_events::{EventBus, NotificationLog};
use sketchform_regions::{HttpRegionSource, RegionCache};
use sketchform_store::{FileBlobStore, RecordStore};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sketchform_api::config::ServerConfig;
use sketchform_api::router::build_app_router;
use sketchform_api::state::{AppState, RecordDesk};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchform_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let notifications = Arc::new(NotificationLog::new(config.notification_log_capacity));
    let log_handle = tokio::spawn({
        let log = Arc::clone(&notifications);
        let receiver = event_bus.subscribe();
        async move { log.run(receiver).await }
    });
    tracing::info!("Notification log started");

    // --- Regions ---
    let source = Arc::new(HttpRegionSource::new(&config.region_api_base_url));
    let regions = Arc::new(RegionCache::new(
        source,
        config.region_fetch_timeout(),
        Arc::clone(&event_bus),
    ));
    let provinces = regions.load_regions().await;
    tracing::info!(count = provinces.len(), "Provinces ready");

    // --- Records ---
    let blobs = FileBlobStore::open(&config.data_dir)
        .await
        .expect("Failed to open data directory");
    let mut store = RecordStore::new(Arc::new(blobs), config.records_key.clone());
    store.load().await;

    // --- Canvas ---
    let board = DrawingBoard::new(config.canvas_width, config.canvas_height, config.history_limit)
        .expect("Failed to initialise canvas");
    tracing::info!(
        width = config.canvas_width,
        height = config.canvas_height,
        "Canvas initialised"
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        regions,
        board: Arc::new(Mutex::new(board)),
        records: Arc::new(Mutex::new(RecordDesk::new(store))),
        event_bus: Arc::clone(&event_bus),
        notifications,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last bus handle closes the channel and ends the log task.
    drop(event_bus);
    let _ = tokio::time::timeout(config.shutdown_timeout(), log_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
