//! Token handling for the admin users calling the lock endpoints.
//!
//! Users authenticate against the host application, which issues the
//! access tokens this service validates.

pub mod jwt;
