//! Sign In Use Case
//!
//! Verifies a credential by recomputation and establishes a session.

use std::sync::Arc;

use board::BoardRepository;
use platform::password::ClearTextPassword;

use crate::application::authenticate::{AuthTicket, authenticate};
use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::infra::session_store::SessionStore;

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user_id: board::UserId,
    pub ticket: AuthTicket,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: BoardRepository,
{
    repo: Arc<R>,
    sessions: SessionStore,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: BoardRepository,
{
    pub fn new(repo: Arc<R>, sessions: SessionStore, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            sessions,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // An unknown name propagates as its own not-found outcome rather
        // than folding into invalid-credentials.
        let user = self.repo.find_user_by_name(&input.username).await?;

        let password = ClearTextPassword::new(input.password);
        let matches = self
            .config
            .password_scheme
            .verify(password.as_str(), &user.name, &user.password)?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let ticket = authenticate(&self.sessions, &self.config, user.id)?;

        tracing::info!(
            user_id = %user.id,
            user_name = %user.name,
            "user signed in"
        );

        Ok(SignInOutput {
            user_id: user.id,
            ticket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use board::{BoardError, JsonDatabase};
    use std::time::Duration;
    use tempfile::tempdir;

    struct Fixture {
        sign_up: SignUpUseCase<JsonDatabase>,
        sign_in: SignInUseCase<JsonDatabase>,
        sessions: SessionStore,
    }

    async fn setup(dir: &std::path::Path) -> Fixture {
        let db = Arc::new(
            JsonDatabase::connect(dir, "signin.json", Duration::from_secs(60))
                .await
                .unwrap(),
        );
        let sessions = SessionStore::new();
        let config = Arc::new(AuthConfig::development());
        Fixture {
            sign_up: SignUpUseCase::new(db.clone(), sessions.clone(), config.clone()),
            sign_in: SignInUseCase::new(db, sessions.clone(), config),
            sessions,
        }
    }

    #[tokio::test]
    async fn test_sign_in_after_sign_up() {
        let dir = tempdir().unwrap();
        let fixture = setup(dir.path()).await;

        let signed_up = fixture
            .sign_up
            .execute(SignUpInput {
                username: "courtier".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        // Same credentials recompute the same hash and match.
        let signed_in = fixture
            .sign_in
            .execute(SignInInput {
                username: "courtier".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(signed_in.user_id, signed_up.user_id);

        let session = fixture.sessions.read(&signed_in.ticket.token).unwrap();
        assert_eq!(session.user_id, signed_up.user_id);
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let dir = tempdir().unwrap();
        let fixture = setup(dir.path()).await;

        fixture
            .sign_up
            .execute(SignUpInput {
                username: "courtier".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        let err = fixture
            .sign_in
            .execute(SignInInput {
                username: "courtier".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_name() {
        let dir = tempdir().unwrap();
        let fixture = setup(dir.path()).await;

        let err = fixture
            .sign_in
            .execute(SignInInput {
                username: "nobody".into(),
                password: "secret".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Storage(BoardError::UserNotFoundByName)
        ));
    }
}
