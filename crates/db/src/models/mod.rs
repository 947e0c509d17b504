//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Rows also derive `Deserialize` so the client crate can decode them.
//! The client builds this crate without the `postgres` feature, which
//! leaves the row types and DTOs but drops `FromRow` and the repositories.

pub mod idea;
pub mod initiative;
pub mod log_entry;
pub mod vision;
pub mod work_session;

#[cfg(feature = "postgres")]
pub use sqlx::types::Json;

/// A JSON column. Serializes exactly like `sqlx::types::Json`, which takes
/// its place when the `postgres` feature is on.
#[cfg(not(feature = "postgres"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);
