use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::event::{EventBus, MatchEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// User-facing feedback (toasts). Fire-and-forget: delivery is never awaited
/// for a result and failures to deliver are not reported back.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, match_id: &str, level: NotificationLevel, message: &str);

    async fn notify_success(&self, match_id: &str, message: &str) {
        self.notify(match_id, NotificationLevel::Success, message)
            .await
    }

    async fn notify_warning(&self, match_id: &str, message: &str) {
        self.notify(match_id, NotificationLevel::Warning, message)
            .await
    }

    async fn notify_error(&self, match_id: &str, message: &str) {
        self.notify(match_id, NotificationLevel::Error, message)
            .await
    }
}

/// Logs each notification and publishes it on the match channel
pub struct EventBusNotifier {
    event_bus: EventBus,
}

impl EventBusNotifier {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

#[async_trait]
impl Notifier for EventBusNotifier {
    async fn notify(&self, match_id: &str, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Success => info!(match_id = %match_id, "{}", message),
            NotificationLevel::Warning => warn!(match_id = %match_id, "{}", message),
            NotificationLevel::Error => error!(match_id = %match_id, "{}", message),
        }

        self.event_bus
            .emit_to_match(
                match_id,
                MatchEvent::Notification {
                    level,
                    message: message.to_string(),
                },
            )
            .await;
    }
}
