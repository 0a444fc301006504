#![allow(dead_code)]

use adminlock_api::auth::jwt::{generate_access_token, JwtConfig};
use adminlock_api::config::{LockingConfig, ServerConfig};
use adminlock_api::router::build_app_router;
use adminlock_api::state::AppState;
use adminlock_db::models::user::CreateUser;
use adminlock_db::repositories::UserRepo;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Static files are served from the workspace `static/` directory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        locking: LockingConfig {
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../../static").to_string(),
            ..LockingConfig::default()
        },
    }
}

/// Build the full application router, with all middleware layers, on the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// A user row plus a valid access token for it.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

/// Insert a user and sign a token for it.
pub async fn create_user(pool: &PgPool, username: &str) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            first_name: capitalize(username),
            last_name: "Example".to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .expect("user insert should succeed");

    let token = generate_access_token(user.id, &user.username, &test_config().jwt)
        .expect("token generation should succeed");
    TestUser { id: user.id, token }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Send an unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send an authenticated request with an optional JSON body.
pub async fn send_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send_auth(app, Method::GET, uri, token, None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send_auth(app, Method::POST, uri, token, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
