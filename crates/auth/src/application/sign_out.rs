//! Sign Out Use Case

use std::sync::Arc;

use crate::application::authenticate::unauthenticate;
use crate::application::config::AuthConfig;
use crate::infra::session_store::SessionStore;

/// Sign out use case
pub struct SignOutUseCase {
    sessions: SessionStore,
    config: Arc<AuthConfig>,
}

impl SignOutUseCase {
    pub fn new(sessions: SessionStore, config: Arc<AuthConfig>) -> Self {
        Self { sessions, config }
    }

    /// Invalidate the presented token; returns the clearing Set-Cookie
    /// value
    pub fn execute(&self, token: &str) -> String {
        let cookie = unauthenticate(&self.sessions, &self.config, token);
        tracing::info!("user signed out");
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::authenticate::authenticate;
    use board::UserId;

    #[test]
    fn test_sign_out_invalidates_token() {
        let sessions = SessionStore::new();
        let config = Arc::new(AuthConfig::default());
        let ticket = authenticate(&sessions, &config, UserId::new()).unwrap();

        let use_case = SignOutUseCase::new(sessions.clone(), config);
        let clear = use_case.execute(&ticket.token);

        assert!(sessions.read(&ticket.token).is_none());
        assert!(clear.contains("Max-Age=0"));
    }
}
