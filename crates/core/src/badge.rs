//! HTML badge shown in the admin change list next to a locked record.

use serde::Serialize;

use crate::error::CoreError;
use crate::locking::LockStatus;
use crate::templates::render;
use crate::types::DbId;

/// Icon shown when the viewer holds the lock.
pub const SELF_LOCK_ICON: &str = "locking/img/page_edit.svg";

/// Icon shown when someone else holds the lock.
pub const OTHER_LOCK_ICON: &str = "locking/img/lock.svg";

/// Display fields of the user holding a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockOwner {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl LockOwner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Everything needed to render one badge.
#[derive(Debug, Clone)]
pub struct LockBadge<'a> {
    pub entry_id: DbId,
    pub status: LockStatus,
    pub owner: Option<&'a LockOwner>,
    pub other_lockers: &'a [String],
}

/// Values interpolated into `badge.html`.
#[derive(Serialize)]
struct BadgeContext<'a> {
    entry_id: DbId,
    full_name: String,
    icon_url: String,
    tooltip: String,
    username: &'a str,
    other_lockers: &'a [String],
}

/// Tooltip for the viewer's own lock.
pub fn self_lock_message(minutes: i64) -> String {
    format!("You have a lock on this content for {minutes} more minute(s).")
}

/// Tooltip for a lock held by `username`.
pub fn other_lock_message(minutes: i64, username: &str) -> String {
    format!("Still locked for {minutes} more minute(s) by {username}.")
}

/// Render the badge. Unlocked records render as an empty string.
///
/// `static_url` is the prefix for icon paths and is expected to end in `/`.
/// Every interpolated value is HTML-escaped by the template engine.
pub fn render_lock_badge(badge: &LockBadge<'_>, static_url: &str) -> Result<String, CoreError> {
    let username = badge.owner.map(|o| o.username.as_str()).unwrap_or("");
    let (icon, tooltip) = match badge.status {
        LockStatus::Unlocked => return Ok(String::new()),
        LockStatus::LockedBySelf { .. } => (
            SELF_LOCK_ICON,
            self_lock_message(badge.status.minutes_remaining()),
        ),
        LockStatus::LockedByOther { .. } => (
            OTHER_LOCK_ICON,
            other_lock_message(badge.status.minutes_remaining(), username),
        ),
    };

    let context = BadgeContext {
        entry_id: badge.entry_id,
        full_name: badge.owner.map(LockOwner::full_name).unwrap_or_default(),
        icon_url: format!("{static_url}{icon}"),
        tooltip,
        username,
        other_lockers: badge.other_lockers,
    };
    render("badge.html", &context)
}
