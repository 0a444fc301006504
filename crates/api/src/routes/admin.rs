//! Route definitions for admin page integration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// GET  /media                          -> media
/// GET  /{app}/{model}/lock-badges      -> lock_badges
/// GET  /{app}/{model}/{id}/form        -> form_context
/// POST /{app}/{model}/{id}/saved       -> record_saved
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/media", get(admin::media))
        .route("/{app}/{model}/lock-badges", get(admin::lock_badges))
        .route("/{app}/{model}/{id}/form", get(admin::form_context))
        .route("/{app}/{model}/{id}/saved", post(admin::record_saved))
}
