//! Per-user session scope.
//!
//! A `Session` owns one `DocumentStore` and one `AiGateway`. The registry keys
//! sessions by UUID and drops those idle for longer than the configured
//! timeout. Sessions never share state with each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::documents::store::DocumentStore;
use crate::gateway::AiGateway;

pub mod handlers;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub store: DocumentStore,
    pub gateway: AiGateway,
    last_accessed: Instant,
}

impl Session {
    pub fn new(id: Uuid, gateway: AiGateway) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            store: DocumentStore::new(),
            gateway,
            last_accessed: Instant::now(),
        }
    }
}

/// Registry of live sessions. Cloning shares the same map.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    /// Cloned into each new session; carries the process-level default key, if any.
    gateway_template: AiGateway,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(gateway_template: AiGateway, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            gateway_template,
            idle_timeout,
        }
    }

    /// Opens a fresh session with empty documents. Expired sessions are swept first.
    pub async fn create(&self) -> Uuid {
        let mut sessions = self.sessions.lock().await;
        self.sweep_expired(&mut sessions);

        let session = Session::new(Uuid::new_v4(), self.gateway_template.clone());
        let id = session.id;
        sessions.insert(id, session);
        info!("Session {id} created ({} live)", sessions.len());
        id
    }

    /// Ends a session, discarding its documents. Returns false if it was unknown.
    pub async fn end(&self, id: Uuid) -> bool {
        match self.sessions.lock().await.remove(&id) {
            Some(session) => {
                info!("Session {} ended", session.id);
                true
            }
            None => false,
        }
    }

    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> Result<R, SessionError> {
        self.update(id, |session| f(session)).await
    }

    /// Runs `f` against the session under the registry lock.
    /// `f` is synchronous so the lock is never held across provider I/O.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.last_accessed = Instant::now();
        Ok(f(session))
    }

    /// Clone of the session's gateway, for calls made outside the lock.
    pub async fn gateway(&self, id: Uuid) -> Result<AiGateway, SessionError> {
        self.read(id, |session| session.gateway.clone()).await
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn sweep_expired(&self, sessions: &mut HashMap<Uuid, Session>) {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_accessed) < self.idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {expired} idle session(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::models::{Achievement, EntryData};
    use crate::gateway::tests::RecordingTransport;

    fn registry(idle_secs: u64) -> SessionRegistry {
        let gateway = AiGateway::new(RecordingTransport::replying(200, "[]"), "https://h", "m");
        SessionRegistry::new(gateway, Duration::from_secs(idle_secs))
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry(60);
        let a = registry.create().await;
        let b = registry.create().await;

        registry
            .update(a, |s| {
                s.store.add_entry(EntryData::Achievement(Achievement {
                    text: "only in a".into(),
                }))
            })
            .await
            .unwrap();

        let b_count = registry
            .read(b, |s| s.store.portfolio().achievements.len())
            .await
            .unwrap();
        assert_eq!(b_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let registry = registry(60);
        let result = registry.read(Uuid::new_v4(), |_| ()).await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_end_discards_session() {
        let registry = registry(60);
        let id = registry.create().await;
        assert!(registry.end(id).await);
        assert!(!registry.end(id).await);
        assert!(registry.read(id, |_| ()).await.is_err());
    }

    #[tokio::test]
    async fn test_session_carries_its_registry_key() {
        let registry = registry(60);
        let id = registry.create().await;
        assert_eq!(registry.read(id, |s| s.id).await.unwrap(), id);
    }

    #[tokio::test]
    async fn test_gateway_clone_does_not_leak_credentials_across_sessions() {
        let registry = registry(60);
        let a = registry.create().await;
        let b = registry.create().await;
        registry
            .update(a, |s| s.gateway.configure("hf_a"))
            .await
            .unwrap();
        assert!(registry.gateway(a).await.unwrap().is_configured());
        assert!(!registry.gateway(b).await.unwrap().is_configured());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire_on_next_create() {
        let registry = registry(60);
        let idle = registry.create().await;
        let active = registry.create().await;

        tokio::time::advance(Duration::from_secs(45)).await;
        registry.read(active, |_| ()).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;

        registry.create().await;
        assert!(registry.read(idle, |_| ()).await.is_err());
        assert!(registry.read(active, |_| ()).await.is_ok());
        assert_eq!(registry.len().await, 2);
    }
}
