use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to drain on shutdown (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Base URL of the region JSON API.
    pub region_api_base_url: String,
    /// Per-request region fetch timeout in milliseconds (default: `5000`).
    pub region_fetch_timeout_ms: u64,
    /// Directory holding persisted blobs (default: `data`).
    pub data_dir: PathBuf,
    /// Blob key the record list is stored under (default: `records`).
    pub records_key: String,
    /// Canvas undo depth (default: `20`).
    pub history_limit: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Where uploaded photos are written and served from (default: `uploads`).
    pub upload_dir: PathBuf,
    /// Maximum accepted photo size in bytes (default: 5 MiB).
    pub upload_max_bytes: usize,
    /// Number of notifications kept for `GET /notifications` (default: `50`).
    pub notification_log_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                                  |
    /// |-----------------------------|------------------------------------------|
    /// | `HOST`                      | `0.0.0.0`                                |
    /// | `PORT`                      | `3000`                                   |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`                  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `5`                                      |
    /// | `REGION_API_BASE_URL`       | `https://ibnux.github.io/data-indonesia` |
    /// | `REGION_FETCH_TIMEOUT_MS`   | `5000`                                   |
    /// | `DATA_DIR`                  | `data`                                   |
    /// | `RECORDS_KEY`               | `records`                                |
    /// | `HISTORY_LIMIT`             | `20`                                     |
    /// | `CANVAS_WIDTH`              | `800`                                    |
    /// | `CANVAS_HEIGHT`             | `500`                                    |
    /// | `UPLOAD_DIR`                | `uploads`                                |
    /// | `UPLOAD_MAX_BYTES`          | `5242880`                                |
    /// | `NOTIFICATION_LOG_CAPACITY` | `50`                                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let region_api_base_url = std::env::var("REGION_API_BASE_URL")
            .unwrap_or_else(|_| sketchform_regions::source::DEFAULT_BASE_URL.into());

        let region_fetch_timeout_ms: u64 = std::env::var("REGION_FETCH_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("REGION_FETCH_TIMEOUT_MS must be a valid u64");

        let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));

        let records_key = std::env::var("RECORDS_KEY").unwrap_or_else(|_| "records".into());

        let history_limit: usize = std::env::var("HISTORY_LIMIT")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("HISTORY_LIMIT must be a valid usize");

        let canvas_width: u32 = std::env::var("CANVAS_WIDTH")
            .unwrap_or_else(|_| "800".into())
            .parse()
            .expect("CANVAS_WIDTH must be a valid u32");

        let canvas_height: u32 = std::env::var("CANVAS_HEIGHT")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .expect("CANVAS_HEIGHT must be a valid u32");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let upload_max_bytes: usize = std::env::var("UPLOAD_MAX_BYTES")
            .unwrap_or_else(|_| sketchform_core::upload::DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("UPLOAD_MAX_BYTES must be a valid usize");

        let notification_log_capacity: usize = std::env::var("NOTIFICATION_LOG_CAPACITY")
            .unwrap_or_else(|_| "50".into())
            .parse()
            .expect("NOTIFICATION_LOG_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            region_api_base_url,
            region_fetch_timeout_ms,
            data_dir,
            records_key,
            history_limit,
            canvas_width,
            canvas_height,
            upload_dir,
            upload_max_bytes,
            notification_log_capacity,
        }
    }

    pub fn region_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.region_fetch_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
