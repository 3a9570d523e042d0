//! Board Error Types
//!
//! Storage-layer error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Board-specific result type alias
pub type BoardResult<T> = Result<T, BoardError>;

/// Storage-layer error variants
///
/// Not-found errors are distinct per entity kind so callers can map each
/// to a precise outcome.
#[derive(Debug, Error)]
pub enum BoardError {
    /// No post with the requested ID
    #[error("no matching post id found")]
    PostNotFound,

    /// No comment with the requested ID
    #[error("no matching comment id found")]
    CommentNotFound,

    /// No user with the requested ID
    #[error("no matching user id found")]
    UserNotFound,

    /// No user with the requested name
    #[error("no matching user name found")]
    UserNotFoundByName,

    /// A statement affected an unexpected number of rows, which signals a
    /// silent conflict (e.g. `ON CONFLICT DO NOTHING` swallowed an insert)
    #[error("statement affected {actual} rows, expected {expected}")]
    RowsAffectedMismatch { expected: u64, actual: u64 },

    /// Backend selector did not name a known backend
    #[error("unsupported storage backend: {0}")]
    UnsupportedBackend(String),

    /// Snapshot file I/O failed
    #[error("snapshot I/O failed: {0}")]
    Snapshot(#[from] std::io::Error),

    /// Snapshot document could not be encoded or decoded
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BoardError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::PostNotFound
            | BoardError::CommentNotFound
            | BoardError::UserNotFound
            | BoardError::UserNotFoundByName => ErrorKind::NotFound,
            BoardError::RowsAffectedMismatch { .. } => ErrorKind::Conflict,
            BoardError::UnsupportedBackend(_)
            | BoardError::Snapshot(_)
            | BoardError::Encoding(_) => ErrorKind::InternalServerError,
            BoardError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Whether this is one of the per-entity not-found variants
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_map_to_404() {
        assert_eq!(BoardError::PostNotFound.status_code(), 404);
        assert_eq!(BoardError::CommentNotFound.status_code(), 404);
        assert_eq!(BoardError::UserNotFound.status_code(), 404);
        assert_eq!(BoardError::UserNotFoundByName.status_code(), 404);
    }

    #[test]
    fn test_rows_affected_mismatch_is_conflict() {
        let err = BoardError::RowsAffectedMismatch {
            expected: 1,
            actual: 0,
        };
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("expected 1"));
    }

    #[test]
    fn test_distinct_messages_per_entity() {
        assert_ne!(
            BoardError::PostNotFound.to_string(),
            BoardError::CommentNotFound.to_string()
        );
        assert_ne!(
            BoardError::UserNotFound.to_string(),
            BoardError::UserNotFoundByName.to_string()
        );
    }
}
