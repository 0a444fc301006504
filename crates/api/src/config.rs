use adminlock_core::locking::{
    LockSettings, DEFAULT_TIME_UNTIL_EXPIRATION_SECS, DEFAULT_TIME_UNTIL_WARNING_SECS,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Lock timing and admin asset locations.
    pub locking: LockingConfig,
}

/// Lock timing plus the URL prefixes the admin pages load assets from.
#[derive(Debug, Clone)]
pub struct LockingConfig {
    pub settings: LockSettings,
    /// Prefix for static assets, always ending in `/`.
    pub static_url: String,
    /// Prefix for admin pages, always ending in `/`.
    pub admin_url: String,
    /// Directory served under `static_url` when it is a local path.
    pub static_dir: String,
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            settings: LockSettings::default(),
            static_url: "/static/".to_string(),
            admin_url: "/admin/".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`LockingConfig::from_env`] for the
    /// remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            locking: LockingConfig::from_env(),
        }
    }
}

impl LockingConfig {
    /// Load locking configuration from environment variables.
    ///
    /// | Env Var                         | Default     |
    /// |---------------------------------|-------------|
    /// | `LOCKING_TIME_UNTIL_EXPIRATION` | `600`       |
    /// | `LOCKING_TIME_UNTIL_WARNING`    | `540`       |
    /// | `STATIC_URL`                    | `/static/`  |
    /// | `ADMIN_URL`                     | `/admin/`   |
    /// | `STATIC_DIR`                    | `static`    |
    ///
    /// # Panics
    ///
    /// Panics if the durations are not integers or are inconsistent.
    pub fn from_env() -> Self {
        let time_until_expiration_secs: i64 = std::env::var("LOCKING_TIME_UNTIL_EXPIRATION")
            .unwrap_or_else(|_| DEFAULT_TIME_UNTIL_EXPIRATION_SECS.to_string())
            .parse()
            .expect("LOCKING_TIME_UNTIL_EXPIRATION must be a valid i64");

        let time_until_warning_secs: i64 = std::env::var("LOCKING_TIME_UNTIL_WARNING")
            .unwrap_or_else(|_| DEFAULT_TIME_UNTIL_WARNING_SECS.to_string())
            .parse()
            .expect("LOCKING_TIME_UNTIL_WARNING must be a valid i64");

        let settings = LockSettings {
            time_until_expiration_secs,
            time_until_warning_secs,
        };
        if let Err(msg) = settings.validate() {
            panic!("Invalid locking configuration: {msg}");
        }

        Self {
            settings,
            static_url: url_prefix(
                &std::env::var("STATIC_URL").unwrap_or_else(|_| "/static/".into()),
            ),
            admin_url: url_prefix(&std::env::var("ADMIN_URL").unwrap_or_else(|_| "/admin/".into())),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalize a URL prefix so that it ends in exactly one `/`.
pub fn url_prefix(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_blanks() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_url_prefix_adds_trailing_slash() {
        assert_eq!(url_prefix("/static"), "/static/");
        assert_eq!(url_prefix("/static/"), "/static/");
        assert_eq!(url_prefix("/static//"), "/static/");
        assert_eq!(url_prefix("https://cdn.test/assets"), "https://cdn.test/assets/");
    }

    #[test]
    fn test_root_prefix_stays_root() {
        assert_eq!(url_prefix("/"), "/");
    }

    #[test]
    fn test_default_locking_config() {
        let config = LockingConfig::default();
        assert_eq!(config.settings.time_until_expiration_secs, 600);
        assert_eq!(config.static_url, "/static/");
        assert_eq!(config.admin_url, "/admin/");
    }
}
