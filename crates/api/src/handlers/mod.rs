//! HTTP handlers, one module per resource.
//!
//! Every successful write publishes a [`RecordChange`](helm_events::RecordChange)
//! on the change bus after the database call returns.

pub mod analytics;
pub mod functions;
pub mod ideas;
pub mod initiatives;
pub mod log_entries;
pub mod sessions;
pub mod storage;
pub mod vision;
