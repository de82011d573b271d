//! Photo upload page, mounted at the root next to `/health`.

use std::convert::Infallible;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::config::ServerConfig;
use crate::handlers::upload;
use crate::state::AppState;

/// Room for the text fields and multipart framing around the photo.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// ```text
/// POST   /upload            -> upload_form (multipart, HTML response)
/// GET    /uploads/{file}    -> stored photos
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_form)
                .layer::<_, Infallible>(DefaultBodyLimit::disable())
                .layer::<_, Infallible>(RequestBodyLimitLayer::new(
                    config.upload_max_bytes + FORM_OVERHEAD_BYTES,
                )),
        )
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
}
