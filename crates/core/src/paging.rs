//! List limits shared by the repository layer.

/// Default page size for record listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Hard cap on any listing.
pub const MAX_LIST_LIMIT: i64 = 500;

/// The journal page loads the most recent month of entries.
pub const DEFAULT_LOG_LIMIT: i64 = 30;

/// Number of chat turns returned when no limit is given.
pub const DEFAULT_CHAT_LIMIT: i64 = 50;

/// Clamp a user-provided limit into `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
