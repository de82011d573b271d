use axum::routing::get;
use axum::Router;

use crate::handlers::records;
use crate::state::AppState;

/// Positional record routes mounted at `/records`.
///
/// ```text
/// GET    /           -> list_records
/// POST   /           -> create_record
/// GET    /{index}    -> get_record
/// PUT    /{index}    -> update_record
/// DELETE /{index}    -> delete_record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(records::list_records).post(records::create_record))
        .route(
            "/{index}",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
}
