//! User Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::ids::UserId;

/// Display name of the sentinel returned for soft-deleted authors
pub const DELETED_USER_NAME: &str = "Deleted";

/// User entity
///
/// `password` holds the encoded credential (PHC string or hex digest,
/// depending on the deployment's scheme), never the plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name, unique board-wide (enforced at sign-up)
    pub name: String,
    /// Encoded password hash
    pub password: String,
    pub date_joined: DateTime<Utc>,
    /// Soft-delete flag; the record stays for referential display
    #[serde(default)]
    pub deleted: bool,
}

impl User {
    /// Create a new user from a validated name and an encoded hash
    pub fn new(name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            password: password_hash.into(),
            date_joined: Utc::now(),
            deleted: false,
        }
    }

    /// The sentinel shown in place of a deleted or missing author
    pub fn deleted_sentinel() -> Self {
        Self {
            id: UserId::nil(),
            name: DELETED_USER_NAME.to_string(),
            password: String::new(),
            date_joined: DateTime::UNIX_EPOCH,
            deleted: true,
        }
    }

    /// Whether this record is the deleted-user sentinel
    pub fn is_sentinel(&self) -> bool {
        self.id.is_nil()
    }
}
