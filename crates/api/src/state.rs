use std::sync::Arc;

use eventra_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: eventra_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Mail transport for the relay. `None` when no transport is configured;
    /// the relay then answers every send with an error.
    pub mailer: Option<Arc<Mailer>>,
}
