//! Auth Middleware
//!
//! Attaches the requester's identity to the request and evicts expired
//! sessions. It never renders output and never rejects a request;
//! whether anonymous callers are acceptable is each handler's decision.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use board::{BoardRepository, User};
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::domain::session::Session;
use crate::domain::token::new_token;
use crate::error::{AuthError, AuthResult};
use crate::infra::session_store::SessionStore;

/// Shared state for the middleware and the auth handlers
#[derive(Clone)]
pub struct AuthState<R>
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub sessions: SessionStore,
    pub config: Arc<AuthConfig>,
}

/// The requester's identity, inserted into request extensions
///
/// `None` means anonymous: no cookie, a stale token, an expired session,
/// or a user record that could not be resolved.
#[derive(Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

/// Middleware resolving the session cookie into a [`CurrentUser`]
///
/// Per request:
/// 1. No `session_token` cookie: proceed anonymous.
/// 2. Token unknown to the store: proceed anonymous (stale token).
/// 3. Session expired: evict it, clear the cookie on the response,
///    proceed anonymous.
/// 4. Valid: resolve the owning user through storage; a failed lookup
///    degrades to anonymous rather than failing the request.
///
/// With rotation enabled, a valid session also gets a fresh token: the
/// new one is written before the handler runs and the presented one is
/// deleted after the handler returns, so the request in flight stays
/// authenticated while a replayed old cookie does not.
pub async fn attach_current_user<R>(
    State(state): State<AuthState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    let mut current = CurrentUser(None);
    let mut clear_cookie = false;
    let mut rotation: Option<(String, String)> = None;

    if let Some(token) = token {
        match lookup_session(&state.sessions, &token) {
            // A stale token is not worth reacting to; an expired one is
            // evicted and its cookie cleared below.
            Err(AuthError::SessionExpired) => {
                clear_cookie = true;
            }
            Err(_) => {}
            Ok(session) => match state.repo.get_user(session.user_id).await {
                Ok(user) => {
                    current = CurrentUser(Some(user));
                    let is_logout = req.uri().path() == state.config.logout_path;
                    if state.config.rotate_sessions && !is_logout {
                        match new_token() {
                            Ok(fresh) => {
                                state.sessions.write(
                                    fresh.clone(),
                                    Session::new(session.user_id, state.config.session_ttl),
                                );
                                let cookie = state.config.cookie().build_set_cookie(&fresh);
                                rotation = Some((token, cookie));
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "token rotation skipped");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "session user lookup failed");
                }
            },
        }
    }

    req.extensions_mut().insert(current);
    let mut response = next.run(req).await;

    if clear_cookie {
        append_set_cookie(&mut response, &state.config.cookie().build_delete_cookie());
    }
    if let Some((old_token, cookie)) = rotation {
        // Only now, with the request complete, does the old token die.
        state.sessions.delete(&old_token);
        append_set_cookie(&mut response, &cookie);
    }

    response
}

/// Resolve a presented token into a live session
///
/// Distinguishes a token the store has never seen (or already dropped)
/// from one whose session expired; the latter is evicted here.
pub fn lookup_session(sessions: &SessionStore, token: &str) -> AuthResult<Session> {
    let session = sessions.read(token).ok_or(AuthError::SessionNotCached)?;
    if session.is_expired() {
        sessions.delete(token);
        return Err(AuthError::SessionExpired);
    }
    Ok(session)
}

fn append_set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => {
            tracing::error!(error = %e, "unrepresentable Set-Cookie value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::COOKIE;
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use board::JsonDatabase;
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::tempdir;
    use tower::ServiceExt;

    async fn probe(Extension(current): Extension<CurrentUser>) -> String {
        match current.user() {
            Some(user) => format!("user:{}", user.name),
            None => "anonymous".to_string(),
        }
    }

    async fn setup(
        dir: &std::path::Path,
        config: AuthConfig,
    ) -> (Router, AuthState<JsonDatabase>) {
        let db = JsonDatabase::connect(dir, "middleware.json", Duration::from_secs(60))
            .await
            .unwrap();
        let state = AuthState {
            repo: Arc::new(db),
            sessions: SessionStore::new(),
            config: Arc::new(config),
        };
        let app = Router::new().route("/probe", get(probe)).layer(
            middleware::from_fn_with_state(state.clone(), attach_current_user::<JsonDatabase>),
        );
        (app, state)
    }

    fn request(cookie: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/probe");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, format!("session_token={cookie}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_lookup_session_distinguishes_missing_from_expired() {
        let sessions = SessionStore::new();
        assert!(matches!(
            lookup_session(&sessions, "never-seen"),
            Err(AuthError::SessionNotCached)
        ));

        sessions.write(
            "stale",
            Session {
                user_id: board::UserId::new(),
                expires_at: Utc::now() - chrono::Duration::seconds(1),
            },
        );
        assert!(matches!(
            lookup_session(&sessions, "stale"),
            Err(AuthError::SessionExpired)
        ));
        // Expired entries are evicted by the lookup itself.
        assert!(sessions.read("stale").is_none());

        sessions.write(
            "live",
            Session::new(board::UserId::new(), Duration::from_secs(60)),
        );
        assert!(lookup_session(&sessions, "live").is_ok());
    }

    #[tokio::test]
    async fn test_no_cookie_is_anonymous() {
        let dir = tempdir().unwrap();
        let (app, _state) = setup(dir.path(), AuthConfig::development()).await;

        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let dir = tempdir().unwrap();
        let (app, _state) = setup(dir.path(), AuthConfig::development()).await;

        let response = app.oneshot(request(Some("feedfacecafebeef"))).await.unwrap();
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_valid_session_attaches_user() {
        let dir = tempdir().unwrap();
        let (app, state) = setup(dir.path(), AuthConfig::development()).await;

        let user_id = state.repo.add_user("courtier", "hash").await.unwrap();
        state.sessions.write(
            "goodtoken",
            Session::new(user_id, Duration::from_secs(60)),
        );

        let response = app.oneshot(request(Some("goodtoken"))).await.unwrap();
        assert_eq!(body_string(response).await, "user:courtier");
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted_and_cookie_cleared() {
        let dir = tempdir().unwrap();
        let (app, state) = setup(dir.path(), AuthConfig::development()).await;

        let user_id = state.repo.add_user("courtier", "hash").await.unwrap();
        state.sessions.write(
            "oldtoken",
            Session {
                user_id,
                expires_at: Utc::now() - chrono::Duration::hours(1),
            },
        );

        let response = app.oneshot(request(Some("oldtoken"))).await.unwrap();

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("session_token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert!(state.sessions.read("oldtoken").is_none());
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_unresolvable_user_degrades_to_anonymous() {
        let dir = tempdir().unwrap();
        let (app, state) = setup(dir.path(), AuthConfig::development()).await;

        // Session points at a user the store has never seen.
        state.sessions.write(
            "orphantoken",
            Session::new(board::UserId::new(), Duration::from_secs(60)),
        );

        let response = app.oneshot(request(Some("orphantoken"))).await.unwrap();
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_rotation_swaps_tokens() {
        let dir = tempdir().unwrap();
        let config = AuthConfig {
            rotate_sessions: true,
            ..AuthConfig::development()
        };
        let (app, state) = setup(dir.path(), config).await;

        let user_id = state.repo.add_user("courtier", "hash").await.unwrap();
        state.sessions.write(
            "spenttoken",
            Session::new(user_id, Duration::from_secs(60)),
        );

        let response = app.oneshot(request(Some("spenttoken"))).await.unwrap();

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let fresh = set_cookie
            .strip_prefix("session_token=")
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        // The request itself was served authenticated.
        assert_eq!(body_string(response).await, "user:courtier");
        // The presented token is dead, its replacement live.
        assert_ne!(fresh, "spenttoken");
        assert!(state.sessions.read("spenttoken").is_none());
        assert_eq!(state.sessions.read(&fresh).unwrap().user_id, user_id);
    }
}
