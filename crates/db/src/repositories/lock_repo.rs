//! Repository for the `locks` table.

use adminlock_core::locking::{ContentType, LockState};
use adminlock_core::types::DbId;
use sqlx::{PgExecutor, Postgres, Transaction};

use crate::models::lock::{Lock, LockWithOwner};

/// Column list for `locks` queries.
const COLUMNS: &str = "id, locked_at, app, model, entry_id, hard_lock, locked_by, \
                       created_at, updated_at";

/// Column list for `locks` joined with the owning user.
const JOINED_COLUMNS: &str = "l.id, l.locked_at, l.app, l.model, l.entry_id, l.hard_lock, \
                              l.locked_by, l.created_at, l.updated_at, \
                              u.username AS owner_username, \
                              u.first_name AS owner_first_name, \
                              u.last_name AS owner_last_name";

/// Most recently locked first. Rows that were never locked (or were
/// released) sort last; ties fall back to the newest row.
const MOST_RECENT_FIRST: &str = "l.locked_at DESC NULLS LAST, l.id DESC";

/// Provides lookups and writes for record locks.
///
/// Reads and writes accept any executor so that a read-check-write
/// sequence can run inside one transaction guarded by [`LockRepo::lock_key`].
pub struct LockRepo;

impl LockRepo {
    /// Take a transaction-scoped advisory lock on one record key.
    ///
    /// Every writer of a key holds this until commit, so a lookup made after
    /// it sees the previous writer's committed row and at most one row is
    /// ever inserted per key.
    pub async fn lock_key(
        tx: &mut Transaction<'_, Postgres>,
        content_type: &ContentType,
        entry_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, $2))")
            .bind(content_type.to_string())
            .bind(entry_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// All lock rows for a record, most recently locked first.
    ///
    /// Normally there is at most one row per record. Callers treat the
    /// first row as the current lock and the rest as stale duplicates.
    pub async fn find_for_entry<'e>(
        executor: impl PgExecutor<'e>,
        content_type: &ContentType,
        entry_id: DbId,
    ) -> Result<Vec<LockWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM locks l \
             LEFT JOIN users u ON u.id = l.locked_by \
             WHERE l.app = $1 AND l.model = $2 AND l.entry_id = $3 \
             ORDER BY {MOST_RECENT_FIRST}"
        );
        sqlx::query_as::<_, LockWithOwner>(&query)
            .bind(&content_type.app_label)
            .bind(&content_type.model)
            .bind(entry_id)
            .fetch_all(executor)
            .await
    }

    /// Lock rows for several records of one content type, grouped by
    /// `entry_id` and most recently locked first within each group.
    pub async fn find_for_entries<'e>(
        executor: impl PgExecutor<'e>,
        content_type: &ContentType,
        entry_ids: &[DbId],
    ) -> Result<Vec<LockWithOwner>, sqlx::Error> {
        if entry_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM locks l \
             LEFT JOIN users u ON u.id = l.locked_by \
             WHERE l.app = $1 AND l.model = $2 AND l.entry_id = ANY($3) \
             ORDER BY l.entry_id, {MOST_RECENT_FIRST}"
        );
        sqlx::query_as::<_, LockWithOwner>(&query)
            .bind(&content_type.app_label)
            .bind(&content_type.model)
            .bind(entry_ids)
            .fetch_all(executor)
            .await
    }

    /// Insert a new lock row for a record.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        content_type: &ContentType,
        entry_id: DbId,
        state: &LockState,
    ) -> Result<Lock, sqlx::Error> {
        let query = format!(
            "INSERT INTO locks (app, model, entry_id, locked_at, locked_by, hard_lock) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lock>(&query)
            .bind(&content_type.app_label)
            .bind(&content_type.model)
            .bind(entry_id)
            .bind(state.locked_at)
            .bind(state.locked_by)
            .bind(state.hard_lock)
            .fetch_one(executor)
            .await
    }

    /// Persist the mutable lock fields of an existing row.
    ///
    /// Returns `sqlx::Error::RowNotFound` if the row no longer exists.
    pub async fn save<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        state: &LockState,
    ) -> Result<Lock, sqlx::Error> {
        let query = format!(
            "UPDATE locks SET locked_at = $2, locked_by = $3, hard_lock = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lock>(&query)
            .bind(id)
            .bind(state.locked_at)
            .bind(state.locked_by)
            .bind(state.hard_lock)
            .fetch_one(executor)
            .await
    }
}
