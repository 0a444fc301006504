//! Domain logic for admin record locking.
//!
//! Nothing in this crate performs IO: lock state transitions, the status
//! decision, badge rendering and admin media all operate on plain values so
//! that the repository layer and the HTTP handlers share one definition.

pub mod badge;
pub mod error;
pub mod locking;
pub mod media;
mod templates;
pub mod types;
