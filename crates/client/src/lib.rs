//! Client-side runtime for Helm.
//!
//! [`HelmApi`] wraps the REST surface, [`ChangeFeed`] the change-feed
//! WebSocket, [`LiveCollection`] keeps a local copy of one table in sync
//! with both, and [`VoiceRecorder`] captures the daily voice log.

pub mod api;
pub mod error;
pub mod feed;
pub mod live;
pub mod recorder;
pub mod types;

pub use api::HelmApi;
pub use error::ClientError;
pub use feed::ChangeFeed;
pub use live::LiveCollection;
pub use recorder::{AudioClip, RecorderState, VoiceRecorder};
