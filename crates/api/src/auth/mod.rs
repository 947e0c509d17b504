//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation for tools and tests).

pub mod jwt;
