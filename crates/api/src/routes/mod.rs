pub mod admin;
pub mod assets;
pub mod health;
pub mod locking;

use axum::Router;

use crate::state::AppState;

/// Public prefix of the lock endpoints, handed to the admin script.
pub const LOCKING_API_BASE: &str = "/api/v1/locking";

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /locking/{app}/{model}/{id}/lock                 take or refresh a lock (POST)
/// /locking/{app}/{model}/{id}/unlock               release a lock (POST)
/// /locking/{app}/{model}/{id}/is_locked            status for the caller (GET)
///
/// /admin/media                                     scripts and stylesheets (GET)
/// /admin/{app}/{model}/lock-badges                 change-list badges (GET)
/// /admin/{app}/{model}/{id}/form                   change-form context (GET)
/// /admin/{app}/{model}/{id}/saved                  save hook (POST)
/// ```
///
/// All routes require authentication.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/locking", locking::router())
        .nest("/admin", admin::router())
}
