use std::sync::Arc;

use crate::config::ServerConfig;
use crate::lockable::LockableAdmin;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: adminlock_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Lock lookup, rendering and save-hook logic for admin pages.
    pub admin: Arc<LockableAdmin>,
}

impl AppState {
    pub fn new(pool: adminlock_db::DbPool, config: ServerConfig) -> Self {
        let admin = Arc::new(LockableAdmin::from_config(&config.locking));
        Self {
            pool,
            config: Arc::new(config),
            admin,
        }
    }
}
