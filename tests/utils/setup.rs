use std::sync::Arc;
use std::time::Duration;

use courtside::{
    event::EventBus,
    scoring::{MatchConfig, Side},
    session::{FinalizeSettings, MatchParticipants, MatchService},
};

use super::mocks::{MockScoreRepository, RecordingNotifier};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: Arc<MatchService>,
    pub repository: Arc<MockScoreRepository>,
    pub notifier: RecordingNotifier,
    pub event_bus: EventBus,
    pub match_id: String,
}

pub struct TestSetupBuilder {
    match_id: String,
    config: MatchConfig,
    repository_latency: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            match_id: "match-123".to_string(),
            config: MatchConfig::default(),
            repository_latency: Duration::ZERO,
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_repository_latency(mut self, latency: Duration) -> Self {
        self.repository_latency = latency;
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = EventBus::new(1000);
        let repository = Arc::new(MockScoreRepository::new());
        repository.set_latency(self.repository_latency).await;
        let notifier = RecordingNotifier::new();

        let service = Arc::new(MatchService::new(
            repository.clone(),
            Arc::new(notifier.clone()),
            event_bus.clone(),
            FinalizeSettings {
                rating_poll_delay: Duration::ZERO,
                rating_poll_attempts: 1,
            },
        ));

        service
            .open_session(
                &self.match_id,
                MatchParticipants::singles("alice", "bob"),
                self.config,
            )
            .await
            .expect("session should open");

        TestSetup {
            service,
            repository,
            notifier,
            event_bus,
            match_id: self.match_id,
        }
    }
}

impl TestSetup {
    pub async fn point(&self, side: Side) {
        self.service
            .award_point(&self.match_id, side, false)
            .await
            .expect("point should be accepted");
    }

    pub async fn game(&self, side: Side) {
        for _ in 0..4 {
            self.point(side).await;
        }
    }

    pub async fn love_set(&self, side: Side) {
        for _ in 0..6 {
            self.game(side).await;
        }
    }

    /// Plays a straight-sets love match for `side`
    pub async fn play_out(&self, side: Side) {
        self.love_set(side).await;
        self.love_set(side).await;
    }
}
