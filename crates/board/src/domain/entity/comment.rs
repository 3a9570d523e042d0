//! Comment Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::ids::{CommentId, PostId, UserId};

/// Comment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub post_id: PostId,
    pub poster_id: UserId,
    pub date_created: DateTime<Utc>,
    /// Soft-delete flag; the record stays for referential display
    #[serde(default)]
    pub deleted: bool,
}

impl Comment {
    pub fn new(content: impl Into<String>, post_id: PostId, poster_id: UserId) -> Self {
        Self {
            id: CommentId::new(),
            content: content.into(),
            post_id,
            poster_id,
            date_created: Utc::now(),
            deleted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_comment() {
        let post_id = PostId::new();
        let poster = UserId::new();
        let comment = Comment::new("hi", post_id, poster);
        assert_eq!(comment.post_id, post_id);
        assert_eq!(comment.poster_id, poster);
        assert!(!comment.deleted);
    }
}
