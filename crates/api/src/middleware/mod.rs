//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the user a request acts on behalf of.

pub mod auth;
