//! Route definitions for songs.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::song;
use crate::state::AppState;

/// Routes mounted at `/songs`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// PUT    /{id}/like   -> like
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(song::list).post(song::create))
        .route(
            "/{id}",
            get(song::get_by_id).put(song::update).delete(song::delete),
        )
        .route("/{id}/like", put(song::like))
}
