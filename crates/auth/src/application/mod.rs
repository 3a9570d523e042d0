//! Application Layer
//!
//! Use cases orchestrating the session store, the password scheme, and
//! the storage backend.

pub mod authenticate;
pub mod config;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

pub use authenticate::{AuthTicket, authenticate, unauthenticate};
pub use config::AuthConfig;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
