//! Public scripts generated from server configuration.

use adminlock_core::media::render_js_variables;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

use crate::routes::LOCKING_API_BASE;
use crate::state::AppState;

/// GET {ADMIN_URL}ajax/variables.js
///
/// Endpoint base URL and lock timeouts for `admin.locking.js`.
pub async fn js_variables(State(state): State<AppState>) -> impl IntoResponse {
    let body = render_js_variables(state.admin.settings(), LOCKING_API_BASE);
    (
        [
            (CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
}
