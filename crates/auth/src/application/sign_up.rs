//! Sign Up Use Case
//!
//! Creates a new account and establishes its first session.

use std::sync::Arc;

use board::rules::{validate_password, validate_username};
use board::{BoardError, BoardRepository};
use platform::password::ClearTextPassword;

use crate::application::authenticate::{AuthTicket, authenticate};
use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::infra::session_store::SessionStore;

/// Sign up input
pub struct SignUpInput {
    pub username: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: board::UserId,
    pub ticket: AuthTicket,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: BoardRepository,
{
    repo: Arc<R>,
    sessions: SessionStore,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        validate_username(&input.username)?;
        validate_password(&input.password)?;

        // Availability pre-check. Not atomic with the insert below: two
        // concurrent sign-ups racing the same name can both pass it. The
        // relational backend's UNIQUE constraint catches that race; the
        // file backend accepts it.
        match self.repo.find_user_by_name(&input.username).await {
            Ok(_) => return Err(AuthError::UserNameTaken),
            Err(BoardError::UserNotFoundByName) => {}
            Err(e) => return Err(e.into()),
        }

        let password = ClearTextPassword::new(input.password);
        let hash = self
            .config
            .password_scheme
            .hash(password.as_str(), &input.username)?;

        let user_id = self.repo.add_user(&input.username, &hash).await?;
        let ticket = authenticate(&self.sessions, &self.config, user_id)?;

        tracing::info!(
            user_id = %user_id,
            user_name = %input.username,
            "user signed up"
        );

        Ok(SignUpOutput { user_id, ticket })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::JsonDatabase;
    use std::time::Duration;
    use tempfile::tempdir;

    async fn setup(dir: &std::path::Path) -> SignUpUseCase<JsonDatabase> {
        let db = JsonDatabase::connect(dir, "signup.json", Duration::from_secs(60))
            .await
            .unwrap();
        SignUpUseCase::new(
            Arc::new(db),
            SessionStore::new(),
            Arc::new(AuthConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_sign_up_stores_salted_hash() {
        let dir = tempdir().unwrap();
        let use_case = setup(dir.path()).await;

        let output = use_case
            .execute(SignUpInput {
                username: "courtier".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        let user = use_case
            .repo
            .find_user_by_name("courtier")
            .await
            .unwrap();
        assert_eq!(user.id, output.user_id);

        // The stored credential is exactly hash(password, name).
        let expected = AuthConfig::development()
            .password_scheme
            .hash("secret", "courtier")
            .unwrap();
        assert_eq!(user.password, expected);

        // And the session minted at sign-up is live.
        assert!(
            !use_case
                .sessions
                .read(&output.ticket.token)
                .unwrap()
                .is_expired()
        );
    }

    #[tokio::test]
    async fn test_sign_up_taken_name() {
        let dir = tempdir().unwrap();
        let use_case = setup(dir.path()).await;

        use_case
            .execute(SignUpInput {
                username: "courtier".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();

        let err = use_case
            .execute(SignUpInput {
                username: "courtier".into(),
                password: "other".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNameTaken));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_bad_fields() {
        let dir = tempdir().unwrap();
        let use_case = setup(dir.path()).await;

        let err = use_case
            .execute(SignUpInput {
                username: "....".into(),
                password: "secret".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = use_case
            .execute(SignUpInput {
                username: "fine".into(),
                password: "".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
