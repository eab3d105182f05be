//! Session management
//!
//! One `ChatSession` per open conversation, held in memory only. The
//! controller sits behind an async mutex; chat handlers use `try_lock`
//! so a second send while a completion is pending is rejected instead of
//! queued, keeping one completion in flight per conversation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::Mutex;
use uuid::Uuid;

use clean_hurghada_agent::ConversationController;

use crate::ServerError;

/// A single chat session
pub struct ChatSession {
    /// Session id handed to the client
    pub id: String,
    /// The conversation, exclusively owned by this session
    pub controller: Mutex<ConversationController>,
    created_at: Instant,
    last_activity: RwLock<Instant>,
}

impl ChatSession {
    fn new(controller: ConversationController) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4().to_string(),
            controller: Mutex::new(controller),
            created_at: now,
            last_activity: RwLock::new(now),
        }
    }

    /// Record activity on the session
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Time since the last activity
    pub fn idle_for(&self) -> Duration {
        self.last_activity.read().elapsed()
    }

    /// Session age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// In-memory session registry with idle eviction
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl SessionManager {
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            idle_timeout,
        }
    }

    /// Register a new session
    ///
    /// Idle sessions are evicted first; when the registry is still full
    /// the new session is refused.
    pub fn create(&self, controller: ConversationController) -> Result<Arc<ChatSession>, ServerError> {
        self.evict_idle();

        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            return Err(ServerError::SessionLimit);
        }

        let session = Arc::new(ChatSession::new(controller));
        sessions.insert(session.id.clone(), Arc::clone(&session));
        tracing::info!(session_id = %session.id, count = sessions.len(), "Session created");
        Ok(session)
    }

    /// Look up a session by id
    pub fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Ids of live sessions
    pub fn list_ids(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Drop sessions that have been idle past the timeout
    pub fn evict_idle(&self) {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() < self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Evicted idle sessions");
        }
    }
}
