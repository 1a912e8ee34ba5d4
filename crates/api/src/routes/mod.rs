pub mod health;
pub mod song;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /songs                 list, create
/// /songs/{id}            get, update, delete
/// /songs/{id}/like       like (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/songs", song::router())
}
