//! Domain logic for Helm.
//!
//! Everything in this crate is pure: no database, no network, no clock
//! reads except where a `now` argument is passed in by the caller.

pub mod analytics;
pub mod error;
pub mod filter;
pub mod ideas;
pub mod initiatives;
pub mod journal;
pub mod paging;
pub mod realtime;
pub mod records;
pub mod timer;
pub mod types;
pub mod view;
pub mod vision;
