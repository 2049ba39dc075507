//! Demo sessions for FileShare.
//!
//! A session only records who the visitor says they are. Login never checks
//! credentials; the session exists so the web layer can tell a "signed in"
//! visitor apart from an anonymous one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Default session lifetime (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// A signed-in demo visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSession {
    /// Opaque bearer token (UUID v4).
    pub token: String,
    /// Display name.
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DemoSession {
    fn new(name: String, email: String, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or_default();

        Self {
            token: Uuid::new_v4().to_string(),
            name,
            email,
            created_at: now,
            expires_at,
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Manager for active demo sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, DemoSession>>>,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionManager {
    /// Create a session manager with the given session lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Start a session for the given visitor.
    ///
    /// The name defaults to the local part of the email when empty.
    pub async fn login(&self, name: Option<&str>, email: &str) -> DemoSession {
        let email = email.trim().to_string();
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => email.split('@').next().unwrap_or_default().to_string(),
        };

        let session = DemoSession::new(name, email, self.ttl);
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        info!(email = %session.email, "Demo session started");
        session
    }

    /// Look up a live session. Expired sessions are dropped.
    pub async fn get(&self, token: &str) -> Option<DemoSession> {
        let session = self.sessions.read().await.get(token).cloned()?;

        if session.is_expired() {
            debug!("Session expired, removing");
            self.sessions.write().await.remove(token);
            return None;
        }

        Some(session)
    }

    /// End a session. Returns `false` if the token was unknown.
    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token).is_some();
        if removed {
            info!("Demo session ended");
        }
        removed
    }

    /// Remove all expired sessions and return how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }

    /// Number of stored sessions (including not yet cleaned expired ones).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
