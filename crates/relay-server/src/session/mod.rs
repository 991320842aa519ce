//! Session Transport Manager
//!
//! Tracks the open SSE sessions of the tool server. Each session owns a
//! bounded inbox; routing a message to a session only enqueues it, so one
//! slow session never blocks another.
//!
//! A session lives exactly as long as its [`SessionGuard`]. Dropping the
//! guard, which happens when the SSE stream ends for any reason, removes the
//! session.

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use relay_domain::error::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::SESSION_INBOX_CAPACITY;
use crate::transport::types::JsonRpcRequest;

/// Table of open sessions keyed by session id
#[derive(Debug, Default)]
pub struct SessionTransportManager {
    sessions: DashMap<String, mpsc::Sender<JsonRpcRequest>>,
}

/// A freshly opened session
#[derive(Debug)]
pub struct OpenedSession {
    /// Session id, unique for the life of the manager
    pub id: String,
    /// Messages routed to this session, in arrival order
    pub inbox: mpsc::Receiver<JsonRpcRequest>,
    /// Keeps the session registered while held
    pub guard: SessionGuard,
}

/// Closes its session on drop
#[derive(Debug)]
pub struct SessionGuard {
    id: String,
    manager: Weak<SessionTransportManager>,
}

impl SessionGuard {
    /// Id of the guarded session
    pub fn session_id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.close_session(&self.id);
        }
    }
}

impl SessionTransportManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session under a fresh random id
    pub fn open_session(self: &Arc<Self>) -> OpenedSession {
        let (tx, inbox) = mpsc::channel(SESSION_INBOX_CAPACITY);
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if let Entry::Vacant(slot) = self.sessions.entry(candidate.clone()) {
                slot.insert(tx.clone());
                break candidate;
            }
        };
        info!(session_id = %id, open = self.sessions.len(), "Session opened");
        OpenedSession {
            guard: SessionGuard {
                id: id.clone(),
                manager: Arc::downgrade(self),
            },
            id,
            inbox,
        }
    }

    /// Remove a session; closing an unknown id is a no-op
    pub fn close_session(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session_id = %id, open = self.sessions.len(), "Session closed");
        }
        removed
    }

    /// Enqueue a message for a session
    ///
    /// Waits only when that session's inbox is full. Fails with
    /// [`Error::UnknownSession`] if the id is not open.
    pub async fn route(&self, id: &str, message: JsonRpcRequest) -> Result<()> {
        let sender = self
            .sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::unknown_session(id))?;

        debug!(session_id = %id, method = %message.method, "Routing message");
        sender.send(message).await.map_err(|_| {
            self.close_session(id);
            Error::unknown_session(id)
        })
    }

    /// Whether a session is open
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of open sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every session, ending their streams
    pub fn close_all(&self) {
        let count = self.sessions.len();
        self.sessions.clear();
        if count > 0 {
            info!(closed = count, "All sessions closed");
        }
    }
}

/// Create a shared session manager
pub fn create_session_manager() -> Arc<SessionTransportManager> {
    Arc::new(SessionTransportManager::new())
}
