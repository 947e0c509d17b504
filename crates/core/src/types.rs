/// Primary keys are UUIDs so clients can mint ids for optimistic inserts.
pub type RecordId = uuid::Uuid;

/// Opaque owner identifier issued by the auth provider.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
