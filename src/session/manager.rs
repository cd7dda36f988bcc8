use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

use super::errors::SessionError;
use super::models::{ScoringSession, SubmissionState};
use crate::event::{EventBus, MatchEvent};

pub type SharedSession = Arc<Mutex<ScoringSession>>;

/// Open scoring sessions keyed by match id.
///
/// Each session sits behind its own mutex so commands for one match are
/// applied strictly in order while other matches proceed independently.
#[derive(Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
    /// Match ids whose result reached the repository; outlives the session
    finalized: Arc<RwLock<HashSet<String>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, session: ScoringSession) -> Result<SharedSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let match_id = session.match_id().to_string();
        if sessions.contains_key(&match_id) {
            return Err(SessionError::AlreadyOpen(match_id));
        }
        if self.finalized.read().await.contains(&match_id) {
            return Err(SessionError::AlreadyFinalized);
        }
        let shared = Arc::new(Mutex::new(session));
        sessions.insert(match_id, shared.clone());
        Ok(shared)
    }

    pub async fn get(&self, match_id: &str) -> Result<SharedSession, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(match_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(match_id.to_string()))
    }

    /// Subscribes to the match feed while the session is known to be open,
    /// so a concurrent close cannot leave behind an orphaned channel.
    pub async fn subscribe(
        &self,
        match_id: &str,
        event_bus: &EventBus,
    ) -> Result<broadcast::Receiver<MatchEvent>, SessionError> {
        let sessions = self.sessions.read().await;
        if !sessions.contains_key(match_id) {
            return Err(SessionError::NotFound(match_id.to_string()));
        }
        Ok(event_bus.subscribe_to_match(match_id).await)
    }

    /// Drops the session and hands it back. Refused while its result is being submitted.
    pub async fn close(&self, match_id: &str) -> Result<SharedSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let shared = sessions
            .get(match_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(match_id.to_string()))?;

        if shared.lock().await.submission() == SubmissionState::InFlight {
            return Err(SessionError::SubmissionInFlight);
        }
        sessions.remove(match_id);
        Ok(shared)
    }

    /// Records that the match result was persisted. Must happen before the
    /// session leaves `InFlight`, otherwise a close and reopen could slip in.
    pub async fn mark_finalized(&self, match_id: &str) {
        self.finalized.write().await.insert(match_id.to_string());
    }

    pub async fn is_finalized(&self, match_id: &str) -> bool {
        self.finalized.read().await.contains(match_id)
    }

    pub async fn has_session(&self, match_id: &str) -> bool {
        self.sessions.read().await.contains_key(match_id)
    }

    pub async fn open_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
