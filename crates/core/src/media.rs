//! Scripts and stylesheets the admin pages include so the lock UI works.

use serde::Serialize;
use serde_json::json;

use crate::error::CoreError;
use crate::locking::LockSettings;
use crate::templates::render;

/// jQuery build the admin locking script was written against.
pub const JQUERY_URL: &str = "//ajax.googleapis.com/ajax/libs/jquery/1.4.2/jquery.min.js";

/// Bumped whenever `admin.locking.js` changes so browsers refetch it.
pub const ADMIN_SCRIPT_VERSION: u32 = 1;

/// Asset lists for the admin page head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminMedia {
    pub js: Vec<String>,
    /// Stylesheets keyed by media type; the locking UI only needs `all`.
    pub css_all: Vec<String>,
}

impl AdminMedia {
    /// Build the asset lists from the static and admin URL prefixes. Both
    /// prefixes are expected to end in `/`.
    pub fn new(static_url: &str, admin_url: &str) -> Self {
        Self {
            js: vec![
                JQUERY_URL.to_string(),
                format!("{static_url}locking/js/jquery.url.packed.js"),
                format!("{admin_url}ajax/variables.js"),
                format!("{static_url}locking/js/admin.locking.js?v={ADMIN_SCRIPT_VERSION}"),
            ],
            css_all: vec![format!("{static_url}locking/css/locking.css")],
        }
    }

    /// Render `<link>` and `<script>` tags, stylesheets first, one per line.
    pub fn render_tags(&self) -> Result<String, CoreError> {
        render("media.html", self)
    }
}

/// Render the `variables.js` document read by `admin.locking.js`.
///
/// `base_url` is the prefix of the lock/unlock/is_locked endpoints.
pub fn render_js_variables(settings: &LockSettings, base_url: &str) -> String {
    let vars = json!({
        "base_url": base_url.trim_end_matches('/'),
        "time_until_expiration": settings.time_until_expiration_secs,
        "time_until_warning": settings.time_until_warning_secs,
    });
    // serde_json output is valid JavaScript object literal syntax.
    let body = serde_json::to_string_pretty(&vars).unwrap_or_else(|_| "{}".to_string());
    format!("var locking = {body};\n")
}
