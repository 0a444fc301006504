//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, plus the `Deserialize` DTOs its endpoints accept.

pub mod lock;
pub mod user;
