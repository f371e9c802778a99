//! Session registry
//!
//! Sessions are independent; each sits behind its own mutex so a turn holds
//! only its session for the full duration, generation included.

use crate::config::EngineConfig;
use crate::engine::{DonationContext, Orchestrator, SessionSnapshot, Variant};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
}

/// One live dialogue
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub orchestrator: Orchestrator,
}

impl Session {
    pub fn snapshot(&self) -> SessionSnapshot {
        self.orchestrator.snapshot(&self.id)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Keyed map of live sessions
pub struct SessionStore {
    config: EngineConfig,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn fresh(&self, id: String, variant: Variant, context: DonationContext) -> (Session, String) {
        let mut orchestrator = Orchestrator::with_entropy(&self.config, variant, context);
        let opening = orchestrator.start();
        let session = Session {
            id,
            created_at: Utc::now(),
            orchestrator,
        };
        (session, opening)
    }

    /// Create a session and return its id and opening line
    pub async fn create(&self, variant: Variant, context: DonationContext) -> (String, String) {
        let id = uuid::Uuid::new_v4().to_string();
        let (session, opening) = self.fresh(id.clone(), variant, context);

        let live = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
            sessions.len()
        };

        tracing::info!(session_id = %id, %variant, live, "Session created");
        (id, opening)
    }

    pub async fn get(&self, id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Start over with the same variant and campaign under the same id
    pub async fn reset(&self, id: &str) -> Result<String, SessionError> {
        let handle = self.get(id).await?;
        let mut session = handle.lock().await;

        let variant = session.orchestrator.variant();
        let context = session.orchestrator.context().clone();
        let (fresh, opening) = self.fresh(id.to_string(), variant, context);
        *session = fresh;

        tracing::info!(session_id = %id, %variant, "Session reset");
        Ok(opening)
    }

    /// Remove a session, returning its final snapshot
    pub async fn remove(&self, id: &str) -> Result<SessionSnapshot, SessionError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        let session = handle.lock().await;
        let snapshot = session.snapshot();
        tracing::info!(
            session_id = %id,
            turns = snapshot.turns,
            age_secs = (Utc::now() - session.created_at).num_seconds(),
            "Session removed"
        );
        Ok(snapshot)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
