//! In-process Session Store
//!
//! Concurrent-safe map from bearer token to [`Session`]. Reads proceed in
//! parallel; writes and deletes take the whole store exclusively. The raw
//! map is never exposed.
//!
//! No persistence: store contents are lost on process restart, which is
//! an accepted limitation of single-instance deployments.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::session::Session;

/// Concurrent token-to-session map
///
/// Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session by token
    ///
    /// Expiry is not checked here; callers evaluate it lazily.
    pub fn read(&self, token: &str) -> Option<Session> {
        self.sessions
            .read()
            // A poisoned lock means a panicked holder; sessions are plain
            // values, so the map is still sound.
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .copied()
    }

    /// Insert or replace the session under `token`
    pub fn write(&self, token: impl Into<String>, session: Session) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), session);
    }

    /// Remove the session under `token`; returns whether one was present
    pub fn delete(&self, token: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    /// Number of sessions currently stored
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::UserId;
    use std::time::Duration;

    #[test]
    fn test_write_then_read() {
        let store = SessionStore::new();
        let user_id = UserId::new();
        store.write("token", Session::new(user_id, Duration::from_secs(60)));

        let session = store.read("token").unwrap();
        assert_eq!(session.user_id, user_id);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_read_unknown_token() {
        let store = SessionStore::new();
        assert!(store.read("missing").is_none());
    }

    #[test]
    fn test_delete() {
        let store = SessionStore::new();
        store.write("token", Session::new(UserId::new(), Duration::from_secs(60)));

        assert!(store.delete("token"));
        assert!(store.read("token").is_none());
        assert!(!store.delete("token"));
    }

    #[test]
    fn test_write_replaces() {
        let store = SessionStore::new();
        let first = UserId::new();
        let second = UserId::new();
        store.write("token", Session::new(first, Duration::from_secs(60)));
        store.write("token", Session::new(second, Duration::from_secs(60)));

        assert_eq!(store.read("token").unwrap().user_id, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        let store = SessionStore::new();
        let mut handles = Vec::new();
        for n in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let token = format!("token-{n}-{i}");
                    store.write(&token, Session::new(UserId::new(), Duration::from_secs(60)));
                    assert!(store.read(&token).is_some());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 800);
    }
}
