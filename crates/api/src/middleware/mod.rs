//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- the user making the request, from a JWT Bearer token.

pub mod auth;
