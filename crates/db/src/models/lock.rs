//! Lock rows and DTOs.

use adminlock_core::badge::LockOwner;
use adminlock_core::locking::LockState;
use adminlock_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Lock
// ---------------------------------------------------------------------------

/// A row from the `locks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lock {
    pub id: DbId,
    pub locked_at: Option<Timestamp>,
    pub app: String,
    pub model: String,
    pub entry_id: DbId,
    pub hard_lock: bool,
    pub locked_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lock {
    pub fn state(&self) -> LockState {
        LockState {
            locked_at: self.locked_at,
            locked_by: self.locked_by,
            hard_lock: self.hard_lock,
        }
    }
}

// ---------------------------------------------------------------------------
// LockWithOwner
// ---------------------------------------------------------------------------

/// A lock row joined with the display fields of its owner.
///
/// The owner columns are `NULL` when the lock has been released or the user
/// was deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LockWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lock: Lock,
    pub owner_username: Option<String>,
    pub owner_first_name: Option<String>,
    pub owner_last_name: Option<String>,
}

impl LockWithOwner {
    pub fn owner(&self) -> Option<LockOwner> {
        self.owner_username.as_ref().map(|username| LockOwner {
            username: username.clone(),
            first_name: self.owner_first_name.clone().unwrap_or_default(),
            last_name: self.owner_last_name.clone().unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Body of a lock request. An empty body takes a soft lock.
#[derive(Debug, Default, Deserialize)]
pub struct LockRequest {
    #[serde(default)]
    pub hard_lock: bool,
}
