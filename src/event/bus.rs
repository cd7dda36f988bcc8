use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::MatchEvent;

/// Event bus distributing match events to live subscribers
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Match-specific event channels: match_id -> sender
    match_channels: Arc<RwLock<HashMap<String, broadcast::Sender<MatchEvent>>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

impl EventBus {
    /// Creates a new event bus; `capacity` bounds each match channel
    pub fn new(capacity: usize) -> Self {
        Self {
            match_channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Emits an event to all subscribers of a specific match
    pub async fn emit_to_match(&self, match_id: &str, event: MatchEvent) {
        let match_channels = self.match_channels.read().await;

        if let Some(sender) = match_channels.get(match_id) {
            match sender.send(event) {
                Ok(receiver_count) => {
                    debug!(
                        match_id = %match_id,
                        receivers = receiver_count,
                        "Match event emitted"
                    );
                }
                Err(_) => {
                    debug!(match_id = %match_id, "Match event emitted with no receivers");
                }
            }
        } else {
            // Nobody has subscribed yet; events are only for live viewers
            debug!(match_id = %match_id, event = event.event_type(), "No match channel - event dropped");
        }
    }

    /// Subscribe to events for a specific match
    pub async fn subscribe_to_match(&self, match_id: &str) -> broadcast::Receiver<MatchEvent> {
        let match_channels = self.match_channels.read().await;

        if let Some(sender) = match_channels.get(match_id) {
            sender.subscribe()
        } else {
            debug!(match_id = %match_id, "Creating new match channel for subscription");
            drop(match_channels);

            let mut match_channels = self.match_channels.write().await;
            match_channels
                .entry(match_id.to_string())
                .or_insert_with(|| broadcast::channel(self.capacity).0)
                .subscribe()
        }
    }

    /// Drops the channel of a closed match; receivers see the channel close
    pub async fn remove_match(&self, match_id: &str) {
        self.match_channels.write().await.remove(match_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe_to_match("m-1").await;

        bus.emit_to_match("m-1", MatchEvent::SessionClosed).await;
        bus.emit_to_match("m-2", MatchEvent::SessionClosed).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type(), "session_closed");
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_remove_match_closes_channel() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe_to_match("m-1").await;

        bus.remove_match("m-1").await;
        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
