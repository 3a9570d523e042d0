//! Post Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::ids::{CommentId, PostId, UserId};

/// Post entity
///
/// `comment_ids` is append-only; insertion order is chronological, so a
/// thread renders oldest-first by walking the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub poster_id: UserId,
    #[serde(default)]
    pub comment_ids: Vec<CommentId>,
    pub date_created: DateTime<Utc>,
}

impl Post {
    pub fn new(title: impl Into<String>, content: impl Into<String>, poster_id: UserId) -> Self {
        Self {
            id: PostId::new(),
            title: title.into(),
            content: content.into(),
            poster_id,
            comment_ids: Vec::new(),
            date_created: Utc::now(),
        }
    }
}
