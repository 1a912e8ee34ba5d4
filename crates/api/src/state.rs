use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once in `main` and injected into every handler. Cheaply cloneable
/// (the pool is reference-counted, config is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: songbook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
