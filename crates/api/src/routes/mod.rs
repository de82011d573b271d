pub mod canvas;
pub mod form;
pub mod health;
pub mod notifications;
pub mod records;
pub mod regions;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /regions                        sorted provinces
/// /regions/reload                 re-fetch provinces (POST)
/// /regions/search?q=              province search
/// /regions/stats                  cache counters
/// /regions/{id}/sub-regions       cities/regencies of a province
/// /sub-regions/search?q=          search cached cities/regencies
///
/// /records                        list, create
/// /records/{index}                get, update, delete
///
/// /form                           edit-binding state
/// /form/edit/{index}              begin edit (POST)
/// /form/edit                      cancel edit (DELETE)
/// /form/submit                    create or update (POST)
///
/// /canvas                         board info
/// /canvas/image                   PNG download
/// /canvas/brush                   set tool / colour / size (PUT)
/// /canvas/strokes                 draw one stroke (POST)
/// /canvas/undo, /redo, /clear     history (POST)
///
/// /notifications                  recent notifications
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/regions", regions::router())
        .nest("/sub-regions", regions::sub_region_router())
        .nest("/records", records::router())
        .nest("/form", form::router())
        .nest("/canvas", canvas::router())
        .nest("/notifications", notifications::router())
}
