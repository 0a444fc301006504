//! Integration tests for the lock / unlock / is_locked endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_user, get_auth, post_auth, send_auth};
use serde_json::json;
use sqlx::PgPool;

const RECORD: &str = "/api/v1/locking/news/article/7";

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlocked_record_reports_unlocked(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, &format!("{RECORD}/is_locked"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "unlocked");
    assert_eq!(json["data"]["html"], "");
    assert!(json["data"]["locked_by"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lock_then_status_for_owner_and_other(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let app = common::build_test_app(pool);

    let response = post_auth(app.clone(), &format!("{RECORD}/lock"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["locked_by"], alice.id);
    assert_eq!(json["data"]["hard_lock"], false);

    let own = body_json(get_auth(app.clone(), &format!("{RECORD}/is_locked"), &alice.token).await).await;
    assert_eq!(own["data"]["status"], "locked_by_self");
    assert!(own["data"]["html"]
        .as_str()
        .unwrap()
        .contains("You have a lock on this content"));

    let other = body_json(get_auth(app, &format!("{RECORD}/is_locked"), &bob.token).await).await;
    assert_eq!(other["data"]["status"], "locked_by_other");
    assert_eq!(other["data"]["locked_by"]["username"], "alice");
    let minutes = other["data"]["minutes_remaining"].as_i64().unwrap();
    assert!((9..=10).contains(&minutes), "got {minutes} minutes");
    assert!(other["data"]["html"]
        .as_str()
        .unwrap()
        .contains(&format!("Still locked for {minutes} more minute(s) by alice.")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_user_cannot_take_lock(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let app = common::build_test_app(pool);

    post_auth(app.clone(), &format!("{RECORD}/lock"), &alice.token).await;
    let response = post_auth(app, &format!("{RECORD}/lock"), &bob.token).await;

    assert_eq!(response.status(), StatusCode::LOCKED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "LOCKED");
    assert!(json["error"].as_str().unwrap().contains("alice"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_can_refresh_lock(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let app = common::build_test_app(pool.clone());

    post_auth(app.clone(), &format!("{RECORD}/lock"), &alice.token).await;
    let response = post_auth(app, &format!("{RECORD}/lock"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1, "refreshing must reuse the existing row");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hard_lock_flag_is_persisted(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = send_auth(
        app,
        Method::POST,
        &format!("{RECORD}/lock"),
        &alice.token,
        Some(json!({ "hard_lock": true })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["hard_lock"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlock_releases_lock(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let app = common::build_test_app(pool);

    post_auth(app.clone(), &format!("{RECORD}/lock"), &alice.token).await;

    let refused = post_auth(app.clone(), &format!("{RECORD}/unlock"), &bob.token).await;
    assert_eq!(refused.status(), StatusCode::LOCKED);

    let response = post_auth(app.clone(), &format!("{RECORD}/unlock"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["locked_by"].is_null());
    assert!(json["data"]["locked_at"].is_null());

    let status = body_json(get_auth(app.clone(), &format!("{RECORD}/is_locked"), &bob.token).await).await;
    assert_eq!(status["data"]["status"], "unlocked");

    let taken = post_auth(app, &format!("{RECORD}/lock"), &bob.token).await;
    assert_eq!(taken.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unlock_without_lock_is_404(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = post_auth(app, &format!("{RECORD}/unlock"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_content_type_is_rejected(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let app = common::build_test_app(pool);

    let response = post_auth(app, "/api/v1/locking/news/art%20icle/7/lock", &alice.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_for_missing_user_cannot_lock(pool: PgPool) {
    let config = common::test_config();
    let token =
        adminlock_api::auth::jwt::generate_access_token(999_999, "ghost", &config.jwt).unwrap();
    let app = common::build_test_app(pool);

    let response = post_auth(app, &format!("{RECORD}/lock"), &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lock_of_deleted_user_is_released(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let app = common::build_test_app(pool.clone());

    post_auth(app.clone(), &format!("{RECORD}/lock"), &alice.token).await;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(alice.id)
        .execute(&pool)
        .await
        .unwrap();

    let status = body_json(get_auth(app.clone(), &format!("{RECORD}/is_locked"), &bob.token).await).await;
    assert_eq!(status["data"]["status"], "unlocked");
    assert_eq!(status["data"]["html"], "");

    let response = post_auth(app, &format!("{RECORD}/lock"), &bob.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["locked_by"], bob.id);
}
