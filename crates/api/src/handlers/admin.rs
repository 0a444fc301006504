//! Handlers backing the admin change list and change form.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{EntryIdsParams, ModelPath, RecordPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/media
///
/// Scripts and stylesheets to include on lockable admin pages.
pub async fn media(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let media = state.admin.media();
    let html = media.render_tags()?;
    Ok(Json(DataResponse {
        data: json!({
            "js": media.js,
            "css": { "all": media.css_all },
            "html": html,
        }),
    }))
}

/// GET /api/v1/admin/{app}/{model}/lock-badges?ids=1,2,3
///
/// Lock badge for each listed record, in request order.
pub async fn lock_badges(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(path): Path<ModelPath>,
    Query(params): Query<EntryIdsParams>,
) -> AppResult<impl IntoResponse> {
    let content_type = path.content_type()?;
    let ids = params.parse()?;

    let badges = state
        .admin
        .lock_badges(
            &state.pool,
            auth.user_id,
            &content_type,
            &ids,
            chrono::Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse { data: badges }))
}

/// GET /api/v1/admin/{app}/{model}/{id}/form
///
/// Lock context for a record's change form.
pub async fn form_context(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
) -> AppResult<impl IntoResponse> {
    let (content_type, entry_id) = path.into_key()?;

    let context = state
        .admin
        .form_context(
            &state.pool,
            auth.user_id,
            &content_type,
            entry_id,
            chrono::Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse { data: context }))
}

/// POST /api/v1/admin/{app}/{model}/{id}/saved
///
/// Called by the host after it saved a record. Releases the caller's lock.
pub async fn record_saved(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(path): Path<RecordPath>,
) -> AppResult<impl IntoResponse> {
    let (content_type, entry_id) = path.into_key()?;

    let released = state
        .admin
        .release_after_save(
            &state.pool,
            auth.user_id,
            &content_type,
            entry_id,
            chrono::Utc::now(),
        )
        .await?;
    Ok(Json(DataResponse {
        data: json!({ "released": released }),
    }))
}
