//! Change-feed fan-out and connection heartbeat.
//!
//! [`ChangeRouter`] subscribes to the [`ChangeBus`](helm_events::ChangeBus)
//! and hands every [`RecordChange`] to the [`WsManager`], which delivers
//! it to the owner's connections subscribed to that table. The same loop
//! pings every connection on a fixed period, so one cancellation token
//! stops both.

use std::sync::Arc;
use std::time::Duration;

use helm_events::RecordChange;
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::ws::WsManager;

pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);

pub struct ChangeRouter {
    ws_manager: Arc<WsManager>,
    heartbeat: Duration,
}

impl ChangeRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self {
            ws_manager,
            heartbeat: DEFAULT_HEARTBEAT,
        }
    }

    /// Ping period. Zero is raised to one millisecond.
    pub fn with_heartbeat(mut self, period: Duration) -> Self {
        self.heartbeat = period.max(Duration::from_millis(1));
        self
    }

    /// Run the routing loop until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<RecordChange>,
        cancel: CancellationToken,
    ) {
        let first_ping = Instant::now() + self.heartbeat;
        let mut heartbeat = tokio::time::interval_at(first_ping, self.heartbeat);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Change router cancelled");
                    break;
                }
                _ = heartbeat.tick() => {
                    let count = self.ws_manager.connection_count().await;
                    tracing::debug!(count, "Heartbeat ping");
                    self.ws_manager.ping_all().await;
                }
                received = receiver.recv() => match received {
                    Ok(change) => {
                        let delivered = self.ws_manager.deliver(&change).await;
                        tracing::trace!(
                            table = %change.kind,
                            record_id = %change.record_id,
                            delivered,
                            "Routed change",
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Change router lagged, changes dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Change bus closed, change router shutting down");
                        break;
                    }
                }
            }
        }
    }
}
