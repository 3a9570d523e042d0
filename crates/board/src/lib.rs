//! Board Storage Backend Module
//!
//! The storage subsystem of the discussion board: domain entities,
//! validation rules, the repository trait, and its two interchangeable
//! backends.
//!
//! ## Structure
//! - `domain/` - Entities, typed IDs, validation rules, repository trait
//! - `infra/` - The JSON file-backed store and the PostgreSQL store
//!
//! ## Backends
//! - [`JsonDatabase`]: three in-memory collections snapshotted to a single
//!   JSON document on a timer
//! - [`PgBoardRepository`]: PostgreSQL behind a connection pool, schema
//!   bootstrapped on connect
//!
//! Both satisfy [`BoardRepository`]; the binary picks one at startup from
//! configuration and the rest of the system stays backend-agnostic.

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use config::{StorageBackend, StorageConfig};
pub use domain::entity::{comment::Comment, post::Post, user::User};
pub use domain::repository::{BoardRepository, PostPage};
pub use domain::value_object::ids::{CommentId, PostId, UserId};
pub use error::{BoardError, BoardResult};
pub use infra::json::JsonDatabase;
pub use infra::postgres::PgBoardRepository;

pub mod rules {
    pub use crate::domain::rules::*;
}
