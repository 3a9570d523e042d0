//! Infrastructure Layer
//!
//! The two storage backend implementations.

pub mod json;
pub mod postgres;

pub use json::JsonDatabase;
pub use postgres::PgBoardRepository;
