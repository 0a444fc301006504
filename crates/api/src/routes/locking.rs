//! Route definitions for record locks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::locking;
use crate::state::AppState;

/// Lock routes mounted at `/locking`.
///
/// ```text
/// POST /{app}/{model}/{id}/lock        -> lock
/// POST /{app}/{model}/{id}/unlock      -> unlock
/// GET  /{app}/{model}/{id}/is_locked   -> is_locked
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{app}/{model}/{id}/lock", post(locking::lock))
        .route("/{app}/{model}/{id}/unlock", post(locking::unlock))
        .route("/{app}/{model}/{id}/is_locked", get(locking::is_locked))
}
