//! Session Entity
//!
//! A server-held record binding a bearer token to a user identity and an
//! absolute expiry. The token itself is the key in the session store;
//! it is never part of the record.

use board::UserId;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Auth session entity
///
/// Lifecycle: created on successful sign-in/sign-up, read on every
/// authenticated request, deleted on logout or lazily on first access
/// after expiry. Nothing sweeps sessions proactively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    /// Owning user (weak reference, no cascading delete)
    pub user_id: UserId,
    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session expiring `ttl` from now
    pub fn new(user_id: UserId, ttl: Duration) -> Self {
        Self {
            user_id,
            expires_at: Utc::now() + ttl,
        }
    }

    /// Whether the expiry has passed
    ///
    /// Evaluated lazily by callers on access.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_not_expired() {
        let session = Session::new(UserId::new(), Duration::from_secs(10));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let session = Session {
            user_id: UserId::new(),
            expires_at: Utc::now() - chrono::Duration::milliseconds(10),
        };
        assert!(session.is_expired());
    }

    #[test]
    fn test_future_expiry_is_not_expired() {
        let session = Session {
            user_id: UserId::new(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        };
        assert!(!session.is_expired());
    }
}
