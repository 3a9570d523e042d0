//! Session Establishment and Teardown
//!
//! The authenticate/unauthenticate pair shared by the sign-up, sign-in
//! and sign-out flows.

use board::UserId;

use crate::application::config::AuthConfig;
use crate::domain::session::Session;
use crate::domain::token::new_token;
use crate::error::AuthResult;
use crate::infra::session_store::SessionStore;

/// A freshly minted session: the token plus the Set-Cookie value that
/// delivers it to the client
#[derive(Debug, Clone)]
pub struct AuthTicket {
    pub token: String,
    pub cookie: String,
}

/// Establish a session for `user_id`
///
/// Mints a token, stores a session expiring TTL from now, and builds the
/// matching cookie.
pub fn authenticate(
    sessions: &SessionStore,
    config: &AuthConfig,
    user_id: UserId,
) -> AuthResult<AuthTicket> {
    let token = new_token()?;
    sessions.write(token.clone(), Session::new(user_id, config.session_ttl));
    let cookie = config.cookie().build_set_cookie(&token);
    Ok(AuthTicket { token, cookie })
}

/// Tear down the session under `token`
///
/// Deletes the store entry and returns the clearing Set-Cookie value.
pub fn unauthenticate(sessions: &SessionStore, config: &AuthConfig, token: &str) -> String {
    sessions.delete(token);
    config.cookie().build_delete_cookie()
}
