//! Admin integration: lock lookup, badge rendering, and the save hook.
//!
//! [`LockableAdmin`] is what an admin page talks to. It finds the current
//! lock for a record (tolerating duplicate rows), decides how that lock
//! looks to the requesting user, renders the change-list badge, and
//! releases the user's lock once the host has saved the record.

use std::collections::HashMap;
use std::future::Future;

use adminlock_core::badge::{render_lock_badge, LockBadge, LockOwner};
use adminlock_core::error::CoreError;
use adminlock_core::locking::{other_lockers, ContentType, LockSettings, LockState, LockStatus};
use adminlock_core::media::AdminMedia;
use adminlock_core::types::{DbId, Timestamp};
use adminlock_db::models::lock::{Lock, LockWithOwner};
use adminlock_db::repositories::{LockRepo, UserRepo};
use adminlock_db::DbPool;
use serde::Serialize;
use sqlx::PgExecutor;

use crate::config::LockingConfig;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Lookup result
// ---------------------------------------------------------------------------

/// The current lock row for a record plus the usernames on any duplicate
/// rows.
#[derive(Debug, Clone)]
pub struct LockLookup {
    pub current: LockWithOwner,
    pub other_lockers: Vec<String>,
}

impl LockLookup {
    /// Build from rows ordered most recently locked first. No rows means
    /// the record is unlocked.
    pub fn from_rows(rows: Vec<LockWithOwner>) -> Option<Self> {
        let others = other_lockers(
            rows.first().and_then(|r| r.owner_username.as_deref()),
            rows.iter().map(|r| r.owner_username.as_deref()),
        );
        let current = rows.into_iter().next()?;
        Some(Self {
            current,
            other_lockers: others,
        })
    }

    pub fn state(&self) -> LockState {
        self.current.lock.state()
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Lock status of one record as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct LockBadgeView {
    pub entry_id: DbId,
    #[serde(flatten)]
    pub status: LockStatus,
    pub minutes_remaining: i64,
    pub hard_lock: bool,
    pub locked_by: Option<LockOwner>,
    pub other_lockers: Vec<String>,
    /// Rendered change-list badge; empty when unlocked.
    pub html: String,
}

/// Context handed to the change form of one record.
#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
    pub content_type: ContentType,
    pub entry_id: DbId,
    pub lock: LockBadgeView,
    /// `false` when a hard lock held by someone else would reject a save.
    pub can_save: bool,
    pub media: AdminMedia,
}

// ---------------------------------------------------------------------------
// LockableAdmin
// ---------------------------------------------------------------------------

/// Lock behaviour shared by every admin model that opts into locking.
#[derive(Debug, Clone)]
pub struct LockableAdmin {
    settings: LockSettings,
    static_url: String,
    admin_url: String,
}

impl LockableAdmin {
    pub fn new(settings: LockSettings, static_url: &str, admin_url: &str) -> Self {
        Self {
            settings,
            static_url: static_url.to_string(),
            admin_url: admin_url.to_string(),
        }
    }

    pub fn from_config(config: &LockingConfig) -> Self {
        Self::new(config.settings, &config.static_url, &config.admin_url)
    }

    pub fn settings(&self) -> &LockSettings {
        &self.settings
    }

    /// Scripts and stylesheets every lockable admin page includes.
    pub fn media(&self) -> AdminMedia {
        AdminMedia::new(&self.static_url, &self.admin_url)
    }

    /// Find the current lock for a record, or `None` if it has never been
    /// locked.
    pub async fn lookup(
        &self,
        pool: &DbPool,
        content_type: &ContentType,
        entry_id: DbId,
    ) -> AppResult<Option<LockLookup>> {
        find_current(pool, content_type, entry_id).await
    }

    /// Build the badge view for one record.
    pub fn badge_view(
        &self,
        entry_id: DbId,
        lookup: Option<&LockLookup>,
        viewer: DbId,
        now: Timestamp,
    ) -> AppResult<LockBadgeView> {
        let Some(lookup) = lookup else {
            return Ok(LockBadgeView {
                entry_id,
                status: LockStatus::Unlocked,
                minutes_remaining: 0,
                hard_lock: false,
                locked_by: None,
                other_lockers: Vec::new(),
                html: String::new(),
            });
        };

        let state = lookup.state();
        let status = state.status_for(viewer, &self.settings, now);
        let owner = lookup.current.owner();
        let html = render_lock_badge(
            &LockBadge {
                entry_id,
                status,
                owner: owner.as_ref(),
                other_lockers: &lookup.other_lockers,
            },
            &self.static_url,
        )?;
        let locked = status.is_locked();

        Ok(LockBadgeView {
            entry_id,
            status,
            minutes_remaining: status.minutes_remaining(),
            hard_lock: locked && state.hard_lock,
            locked_by: if locked { owner } else { None },
            other_lockers: if locked {
                lookup.other_lockers.clone()
            } else {
                Vec::new()
            },
            html,
        })
    }

    /// Lock status and badge for one record.
    pub async fn lock_badge(
        &self,
        pool: &DbPool,
        viewer: DbId,
        content_type: &ContentType,
        entry_id: DbId,
        now: Timestamp,
    ) -> AppResult<LockBadgeView> {
        let lookup = self.lookup(pool, content_type, entry_id).await?;
        self.badge_view(entry_id, lookup.as_ref(), viewer, now)
    }

    /// Lock status and badge for every record on a change-list page, in the
    /// order requested.
    pub async fn lock_badges(
        &self,
        pool: &DbPool,
        viewer: DbId,
        content_type: &ContentType,
        entry_ids: &[DbId],
        now: Timestamp,
    ) -> AppResult<Vec<LockBadgeView>> {
        let rows = LockRepo::find_for_entries(pool, content_type, entry_ids).await?;

        let mut grouped: HashMap<DbId, Vec<LockWithOwner>> = HashMap::new();
        for row in rows {
            grouped.entry(row.lock.entry_id).or_default().push(row);
        }
        let lookups: HashMap<DbId, LockLookup> = grouped
            .into_iter()
            .filter_map(|(id, rows)| LockLookup::from_rows(rows).map(|l| (id, l)))
            .collect();

        entry_ids
            .iter()
            .map(|id| self.badge_view(*id, lookups.get(id), viewer, now))
            .collect()
    }

    /// Take or refresh the lock on a record for `user`.
    pub async fn lock(
        &self,
        pool: &DbPool,
        user: DbId,
        content_type: &ContentType,
        entry_id: DbId,
        hard_lock: bool,
        now: Timestamp,
    ) -> AppResult<Lock> {
        match UserRepo::find_by_id(pool, user).await? {
            Some(u) if u.is_active => {}
            _ => {
                return Err(AppError::Core(CoreError::Unauthorized(
                    "Unknown or inactive user".into(),
                )))
            }
        }

        let mut tx = pool.begin().await?;
        LockRepo::lock_key(&mut tx, content_type, entry_id).await?;

        let lock = match find_current(&mut *tx, content_type, entry_id).await? {
            Some(lookup) => {
                let mut state = lookup.state();
                state
                    .lock_for(user, hard_lock, &self.settings, now)
                    .map_err(|_| locked_error(content_type, entry_id, &lookup))?;
                LockRepo::save(&mut *tx, lookup.current.lock.id, &state).await?
            }
            None => {
                let state = LockState {
                    locked_at: Some(now),
                    locked_by: Some(user),
                    hard_lock,
                };
                LockRepo::insert(&mut *tx, content_type, entry_id, &state).await?
            }
        };
        tx.commit().await?;

        tracing::info!(
            user_id = user,
            content_type = %content_type,
            entry_id,
            hard_lock,
            "Lock acquired"
        );
        Ok(lock)
    }

    /// Release `user`'s lock on a record.
    ///
    /// Fails with `NotFound` when the record has no lock row and with
    /// `Locked` when someone else holds an active lock.
    pub async fn unlock(
        &self,
        pool: &DbPool,
        user: DbId,
        content_type: &ContentType,
        entry_id: DbId,
        now: Timestamp,
    ) -> AppResult<Lock> {
        let mut tx = pool.begin().await?;
        LockRepo::lock_key(&mut tx, content_type, entry_id).await?;

        let lookup = find_current(&mut *tx, content_type, entry_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lock",
                id: entry_id,
            })?;

        let mut state = lookup.state();
        state
            .unlock_for(user, &self.settings, now)
            .map_err(|_| locked_error(content_type, entry_id, &lookup))?;
        let lock = LockRepo::save(&mut *tx, lookup.current.lock.id, &state).await?;
        tx.commit().await?;

        tracing::info!(
            user_id = user,
            content_type = %content_type,
            entry_id,
            "Lock released"
        );
        Ok(lock)
    }

    /// Save hook: release `user`'s lock after the host saved the record.
    ///
    /// Returns `Ok(true)` if a lock was released. A record without a lock
    /// row (typically one that was just created) and a lock held by someone
    /// else are both left alone and return `Ok(false)`. Database errors are
    /// returned to the caller.
    pub async fn release_after_save(
        &self,
        pool: &DbPool,
        user: DbId,
        content_type: &ContentType,
        entry_id: DbId,
        now: Timestamp,
    ) -> AppResult<bool> {
        let mut tx = pool.begin().await?;
        LockRepo::lock_key(&mut tx, content_type, entry_id).await?;

        let Some(lookup) = find_current(&mut *tx, content_type, entry_id).await? else {
            tracing::debug!(
                content_type = %content_type,
                entry_id,
                "Saved record has no lock"
            );
            return Ok(false);
        };

        let before = lookup.state();
        let mut state = before;
        if let Err(held) = state.unlock_for(user, &self.settings, now) {
            tracing::info!(
                user_id = user,
                holder = held.holder,
                content_type = %content_type,
                entry_id,
                "Record saved while locked by another user, lock left in place"
            );
            return Ok(false);
        }
        if before == state {
            return Ok(false);
        }

        LockRepo::save(&mut *tx, lookup.current.lock.id, &state).await?;
        tx.commit().await?;
        tracing::info!(
            user_id = user,
            content_type = %content_type,
            entry_id,
            "Lock released after save"
        );
        Ok(true)
    }

    /// Run the host's `save` for a record, then release the saver's lock.
    ///
    /// A hard lock held by another user rejects the save before `save` is
    /// polled.
    pub async fn save_model<T, F>(
        &self,
        pool: &DbPool,
        user: DbId,
        content_type: &ContentType,
        entry_id: DbId,
        now: Timestamp,
        save: F,
    ) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if let Some(lookup) = self.lookup(pool, content_type, entry_id).await? {
            if lookup.state().blocks_save_by(user, &self.settings, now) {
                return Err(locked_error(content_type, entry_id, &lookup));
            }
        }

        let saved = save.await?;
        self.release_after_save(pool, user, content_type, entry_id, now)
            .await?;
        Ok(saved)
    }

    /// Context for the change form of one record.
    pub async fn form_context(
        &self,
        pool: &DbPool,
        viewer: DbId,
        content_type: &ContentType,
        entry_id: DbId,
        now: Timestamp,
    ) -> AppResult<FormContext> {
        let lookup = self.lookup(pool, content_type, entry_id).await?;
        let can_save = lookup
            .as_ref()
            .map(|l| !l.state().blocks_save_by(viewer, &self.settings, now))
            .unwrap_or(true);

        Ok(FormContext {
            content_type: content_type.clone(),
            entry_id,
            lock: self.badge_view(entry_id, lookup.as_ref(), viewer, now)?,
            can_save,
            media: self.media(),
        })
    }
}

/// Current lock row for a record plus any duplicates, most recent first.
async fn find_current<'e>(
    executor: impl PgExecutor<'e>,
    content_type: &ContentType,
    entry_id: DbId,
) -> AppResult<Option<LockLookup>> {
    let rows = LockRepo::find_for_entry(executor, content_type, entry_id).await?;
    if rows.len() > 1 {
        tracing::warn!(
            content_type = %content_type,
            entry_id,
            rows = rows.len(),
            "Multiple lock rows for one record, using the most recent"
        );
    }
    Ok(LockLookup::from_rows(rows))
}

fn locked_error(content_type: &ContentType, entry_id: DbId, lookup: &LockLookup) -> AppError {
    let holder = lookup
        .current
        .owner_username
        .clone()
        .unwrap_or_else(|| "another user".to_string());
    AppError::Core(CoreError::Locked {
        content_type: content_type.to_string(),
        entry_id,
        holder,
    })
}
