//! Handlers for the lock endpoints the admin script calls while a record's
//! change form is open.

use adminlock_db::models::lock::LockRequest;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::RecordPath;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/locking/{app}/{model}/{id}/lock
///
/// Take or refresh the caller's lock. Returns 423 if another user holds an
/// active lock. An empty body takes a soft lock.
pub async fn lock(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
    body: Option<Json<LockRequest>>,
) -> AppResult<impl IntoResponse> {
    let (content_type, entry_id) = path.into_key()?;
    let hard_lock = body.map(|Json(b)| b.hard_lock).unwrap_or(false);

    let lock = state
        .admin
        .lock(
            &state.pool,
            auth.user_id,
            &content_type,
            entry_id,
            hard_lock,
            chrono::Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse { data: lock }))
}

/// POST /api/v1/locking/{app}/{model}/{id}/unlock
///
/// Release the caller's lock. Returns 423 if another user holds it.
pub async fn unlock(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
) -> AppResult<impl IntoResponse> {
    let (content_type, entry_id) = path.into_key()?;

    let lock = state
        .admin
        .unlock(
            &state.pool,
            auth.user_id,
            &content_type,
            entry_id,
            chrono::Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse { data: lock }))
}

/// GET /api/v1/locking/{app}/{model}/{id}/is_locked
///
/// Lock status of a record from the caller's point of view.
pub async fn is_locked(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
) -> AppResult<impl IntoResponse> {
    let (content_type, entry_id) = path.into_key()?;

    let view = state
        .admin
        .lock_badge(
            &state.pool,
            auth.user_id,
            &content_type,
            entry_id,
            chrono::Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse { data: view }))
}
