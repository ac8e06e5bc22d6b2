//! Session registry: tracks connected participants
//!
//! Sessions are flat peers. Any session may produce frames or change the
//! stream mode; none carries a role field.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;
use uuid::Uuid;

/// Opaque identifier for one connected participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Allocate a fresh unique identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One connected participant of the stream
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique per-connection identifier
    pub id: SessionId,
    /// When the connection was established
    pub connected_at: SystemTime,
}

/// Concurrency-safe registry of active sessions.
///
/// The registry owns sessions exclusively; the relay references them only by
/// id. The lock is a sync `parking_lot::RwLock` — no `.await` is ever held
/// across it, and `active_sessions` copies out under the read guard so
/// iteration never observes concurrent mutation.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh session id and record its connect time.
    ///
    /// Never fails: if the underlying transport rejects the connection the
    /// caller simply does not register.
    pub fn register(&self) -> SessionId {
        let id = SessionId::new();
        let session = Session {
            id,
            connected_at: SystemTime::now(),
        };
        self.sessions.write().insert(id, session);
        id
    }

    /// Remove a session. Idempotent: unknown or already-removed ids are a
    /// no-op, since connections can close concurrently with delivery attempts.
    pub fn unregister(&self, id: SessionId) {
        self.sessions.write().remove(&id);
    }

    /// Snapshot of the currently active session ids, safe to iterate while
    /// other sessions connect and disconnect.
    pub fn active_sessions(&self) -> Vec<SessionId> {
        self.sessions.read().keys().copied().collect()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_allocates_unique_ids() {
        let registry = SessionRegistry::new();
        let a = registry.register();
        let b = registry.register();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(a));
        assert!(registry.contains(b));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = SessionRegistry::new();
        let a = registry.register();
        let b = registry.register();

        registry.unregister(a);
        registry.unregister(a);
        // Unknown id is also a no-op
        registry.unregister(SessionId::new());

        assert!(!registry.contains(a));
        assert!(registry.contains(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_active_sessions_is_a_snapshot() {
        let registry = SessionRegistry::new();
        let a = registry.register();
        let snapshot = registry.active_sessions();

        registry.unregister(a);

        // The snapshot is unaffected by later mutation
        assert_eq!(snapshot, vec![a]);
        assert!(registry.active_sessions().is_empty());
    }

    #[test]
    fn test_concurrent_register_unregister() {
        use std::sync::Arc;

        let registry = Arc::new(SessionRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let id = registry.register();
                    let _ = registry.active_sessions();
                    registry.unregister(id);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(registry.is_empty());
    }
}
