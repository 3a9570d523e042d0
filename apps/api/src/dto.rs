//! Response DTOs
//!
//! JSON views over the domain entities. The password hash never leaves
//! the storage layer through these.

use board::{Comment, Post, PostPage, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub date_joined: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            date_joined: user.date_joined,
        }
    }
}

/// Public view of a post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub poster_id: String,
    pub comment_count: usize,
    pub date_created: DateTime<Utc>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            content: post.content.clone(),
            poster_id: post.poster_id.to_string(),
            comment_count: post.comment_ids.len(),
            date_created: post.date_created,
        }
    }
}

/// A comment together with its (possibly sentinel) author
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub poster: UserView,
    pub date_created: DateTime<Utc>,
}

/// GET / response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub viewer: Option<UserView>,
    pub posts: Vec<PostView>,
}

/// GET /post/{id} response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageResponse {
    pub viewer: Option<UserView>,
    pub post: PostView,
    pub poster: UserView,
    pub comments: Vec<CommentView>,
}

impl PostPageResponse {
    pub fn new(viewer: Option<UserView>, page: PostPage) -> Self {
        let comments = page
            .comments
            .iter()
            .map(|comment: &Comment| CommentView {
                id: comment.id.to_string(),
                content: comment.content.clone(),
                poster: page
                    .commenters
                    .get(&comment.id)
                    .map(UserView::from)
                    .unwrap_or_else(|| UserView::from(&User::deleted_sentinel())),
                date_created: comment.date_created,
            })
            .collect();

        Self {
            viewer,
            post: PostView::from(&page.post),
            poster: UserView::from(&page.poster),
            comments,
        }
    }
}
