//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use board::BoardRepository;

use crate::presentation::handlers;
use crate::presentation::middleware::AuthState;

/// Create the auth router for any repository implementation
///
/// The caller layers `attach_current_user` around this, since the
/// handlers read `CurrentUser` from request extensions.
pub fn auth_router<R>(state: AuthState<R>) -> Router
where
    R: BoardRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/logout", post(handlers::log_out::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .with_state(state)
}
