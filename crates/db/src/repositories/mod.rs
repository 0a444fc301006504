//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod lock_repo;
pub mod user_repo;

pub use lock_repo::LockRepo;
pub use user_repo::UserRepo;
