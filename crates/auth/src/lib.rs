//! Auth (Session Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity and token generation
//! - `application/` - Use cases (sign up, sign in, sign out)
//! - `infra/` - The in-process session store
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - User signup/signin with username + password
//! - Server-side sessions with cookie-based bearer tokens
//! - Optional token rotation on every authenticated request
//!
//! ## Security Model
//! - Passwords hashed with a deployment-wide scheme (Argon2id default)
//! - Tokens are 16 bytes of OS entropy, hex-encoded
//! - Sessions expire after a fixed TTL and are evicted lazily

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::authenticate::{AuthTicket, authenticate, unauthenticate};
pub use application::config::AuthConfig;
pub use domain::session::Session;
pub use domain::token::new_token;
pub use error::{AuthError, AuthResult};
pub use infra::session_store::SessionStore;
pub use presentation::middleware::{AuthState, CurrentUser, attach_current_user};
pub use presentation::router::auth_router;

pub mod config {
    pub use crate::application::config::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
