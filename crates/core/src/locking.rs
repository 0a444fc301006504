//! Record lock state, expiry arithmetic, and the per-viewer status decision.
//!
//! A lock row identifies a record by its [`ContentType`] and entry id, and
//! carries the owner, the time it was taken and a hard/soft flag. Expiry is
//! purely time based: a lock whose timestamp is older than
//! [`LockSettings::time_until_expiration_secs`] is treated as released even
//! though the row still names an owner.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Timing constants
// ---------------------------------------------------------------------------

/// Seconds a lock stays active after it was taken or refreshed (10 minutes).
pub const DEFAULT_TIME_UNTIL_EXPIRATION_SECS: i64 = 600;

/// Seconds after which the admin script warns the editor that the lock is
/// about to expire (9 minutes).
pub const DEFAULT_TIME_UNTIL_WARNING_SECS: i64 = 540;

/// Maximum length of an app label or model name.
pub const MAX_CONTENT_TYPE_PART_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Content type
// ---------------------------------------------------------------------------

/// The `(app label, model name)` pair identifying which kind of record a
/// lock applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentType {
    pub app_label: String,
    pub model: String,
}

impl ContentType {
    /// Build a validated content type.
    pub fn new(app_label: &str, model: &str) -> Result<Self, CoreError> {
        validate_content_type_part("app label", app_label)?;
        validate_content_type_part("model", model)?;
        Ok(Self {
            app_label: app_label.to_string(),
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model)
    }
}

fn validate_content_type_part(what: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{what} must not be empty")));
    }
    if value.len() > MAX_CONTENT_TYPE_PART_LEN {
        return Err(CoreError::Validation(format!(
            "{what} must be at most {MAX_CONTENT_TYPE_PART_LEN} characters, got {}",
            value.len()
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(CoreError::Validation(format!(
            "{what} '{value}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Validate a record id used as a lock key. Ids are non-negative.
pub fn validate_entry_id(entry_id: DbId) -> Result<(), CoreError> {
    if entry_id < 0 {
        return Err(CoreError::Validation(format!(
            "entry_id must not be negative, got {entry_id}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Lock timing configuration shared by the server and the admin script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockSettings {
    pub time_until_expiration_secs: i64,
    pub time_until_warning_secs: i64,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            time_until_expiration_secs: DEFAULT_TIME_UNTIL_EXPIRATION_SECS,
            time_until_warning_secs: DEFAULT_TIME_UNTIL_WARNING_SECS,
        }
    }
}

impl LockSettings {
    /// Both durations must be positive and the warning must fire before
    /// the lock expires.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_until_expiration_secs <= 0 {
            return Err(format!(
                "time until expiration must be positive, got {}",
                self.time_until_expiration_secs
            ));
        }
        if self.time_until_warning_secs <= 0 {
            return Err(format!(
                "time until warning must be positive, got {}",
                self.time_until_warning_secs
            ));
        }
        if self.time_until_warning_secs >= self.time_until_expiration_secs {
            return Err(format!(
                "time until warning ({}) must be less than time until expiration ({})",
                self.time_until_warning_secs, self.time_until_expiration_secs
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lock state
// ---------------------------------------------------------------------------

/// Returned when an operation would override a lock held by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("lock is held by user {holder} for another {seconds_remaining} second(s)")]
pub struct LockHeld {
    pub holder: DbId,
    pub seconds_remaining: i64,
}

/// The mutable part of a lock row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LockState {
    pub locked_at: Option<Timestamp>,
    pub locked_by: Option<DbId>,
    pub hard_lock: bool,
}

impl LockState {
    /// Whole seconds elapsed since the lock was taken, or `None` if the row
    /// has never been locked (or was unlocked).
    fn elapsed_secs(&self, now: Timestamp) -> Option<i64> {
        self.locked_at.map(|at| (now - at).num_seconds())
    }

    /// A lock is active while it has an owner and its age is below the
    /// expiration window. A row whose owner was deleted is free.
    pub fn is_locked(&self, settings: &LockSettings, now: Timestamp) -> bool {
        match (self.locked_by, self.elapsed_secs(now)) {
            (Some(_), Some(elapsed)) => elapsed < settings.time_until_expiration_secs,
            _ => false,
        }
    }

    /// Seconds until the lock expires, never negative.
    pub fn seconds_remaining(&self, settings: &LockSettings, now: Timestamp) -> i64 {
        match self.elapsed_secs(now) {
            Some(elapsed) => (settings.time_until_expiration_secs - elapsed).max(0),
            None => 0,
        }
    }

    /// Active and owned by `user`.
    pub fn is_locked_by(&self, user: DbId, settings: &LockSettings, now: Timestamp) -> bool {
        self.is_locked(settings, now) && self.locked_by == Some(user)
    }

    /// Active and owned by someone other than `user`. A lock never applies
    /// to its own holder.
    pub fn applies_to(&self, user: DbId, settings: &LockSettings, now: Timestamp) -> bool {
        self.is_locked(settings, now) && self.locked_by != Some(user)
    }

    /// Hard locks held by another user block saves. Soft locks are advisory.
    pub fn blocks_save_by(&self, user: DbId, settings: &LockSettings, now: Timestamp) -> bool {
        self.hard_lock && self.applies_to(user, settings, now)
    }

    fn held_error(&self, settings: &LockSettings, now: Timestamp) -> LockHeld {
        LockHeld {
            holder: self.locked_by.unwrap_or_default(),
            seconds_remaining: self.seconds_remaining(settings, now),
        }
    }

    /// Take (or refresh) the lock for `user`.
    pub fn lock_for(
        &mut self,
        user: DbId,
        hard_lock: bool,
        settings: &LockSettings,
        now: Timestamp,
    ) -> Result<(), LockHeld> {
        if self.applies_to(user, settings, now) {
            return Err(self.held_error(settings, now));
        }
        self.locked_at = Some(now);
        self.locked_by = Some(user);
        self.hard_lock = hard_lock;
        Ok(())
    }

    /// Release the lock on behalf of `user`. Expired locks and locks the
    /// user holds are released; an active lock held by another user is not.
    pub fn unlock_for(
        &mut self,
        user: DbId,
        settings: &LockSettings,
        now: Timestamp,
    ) -> Result<(), LockHeld> {
        if self.applies_to(user, settings, now) {
            return Err(self.held_error(settings, now));
        }
        self.unlock();
        Ok(())
    }

    /// Unconditionally clear the lock.
    pub fn unlock(&mut self) {
        self.locked_at = None;
        self.locked_by = None;
        self.hard_lock = false;
    }

    /// Decide how the lock looks to `viewer`.
    pub fn status_for(&self, viewer: DbId, settings: &LockSettings, now: Timestamp) -> LockStatus {
        if !self.is_locked(settings, now) {
            return LockStatus::Unlocked;
        }
        let seconds_remaining = self.seconds_remaining(settings, now);
        if self.locked_by == Some(viewer) {
            LockStatus::LockedBySelf { seconds_remaining }
        } else {
            LockStatus::LockedByOther { seconds_remaining }
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// What a viewer sees for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LockStatus {
    Unlocked,
    LockedBySelf { seconds_remaining: i64 },
    LockedByOther { seconds_remaining: i64 },
}

impl LockStatus {
    pub fn is_locked(&self) -> bool {
        !matches!(self, LockStatus::Unlocked)
    }

    pub fn seconds_remaining(&self) -> i64 {
        match self {
            LockStatus::Unlocked => 0,
            LockStatus::LockedBySelf { seconds_remaining }
            | LockStatus::LockedByOther { seconds_remaining } => *seconds_remaining,
        }
    }

    /// Remaining time in whole minutes, rounded down.
    pub fn minutes_remaining(&self) -> i64 {
        minutes_remaining(self.seconds_remaining())
    }
}

/// Whole minutes in `seconds`, rounded down.
pub fn minutes_remaining(seconds: i64) -> i64 {
    seconds.max(0) / 60
}

// ---------------------------------------------------------------------------
// Duplicate rows
// ---------------------------------------------------------------------------

/// Distinct usernames among `all`, minus the primary lock holder, sorted.
///
/// Used when more than one lock row exists for the same record.
pub fn other_lockers<'a>(
    primary: Option<&str>,
    all: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<String> {
    all.into_iter()
        .flatten()
        .filter(|name| Some(*name) != primary)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
