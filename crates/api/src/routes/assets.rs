//! Root-level routes for admin assets: the generated `variables.js` and the
//! static files under `STATIC_URL`.

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::LockingConfig;
use crate::handlers::assets;
use crate::state::AppState;

/// Mount asset routes. Prefixes that are not local paths (for example a CDN
/// URL) are served elsewhere and skipped here.
pub fn router(config: &LockingConfig) -> Router<AppState> {
    let mut router = Router::new();

    if config.admin_url.starts_with('/') {
        let path = format!("{}ajax/variables.js", config.admin_url);
        router = router.route(&path, get(assets::js_variables));
    }

    let static_path = config.static_url.trim_end_matches('/');
    if static_path.starts_with('/') {
        router = router.nest_service(static_path, ServeDir::new(&config.static_dir));
    } else {
        tracing::debug!(static_url = %config.static_url, "Static files not served locally");
    }

    router
}
