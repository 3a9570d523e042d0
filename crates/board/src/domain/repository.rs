//! Repository Trait
//!
//! The storage contract every backend satisfies. Implementations live in
//! the infrastructure layer; everything above this trait is
//! backend-agnostic.

use std::collections::HashMap;

use crate::domain::entity::{comment::Comment, post::Post, user::User};
use crate::domain::value_object::ids::{CommentId, PostId, UserId};
use crate::error::BoardResult;

/// Read-optimized aggregate for rendering one thread
#[derive(Debug, Clone)]
pub struct PostPage {
    pub post: Post,
    pub poster: User,
    /// Comments ordered by creation time, ascending
    pub comments: Vec<Comment>,
    /// Author of each comment; deleted or missing authors resolve to the
    /// sentinel user instead of failing the aggregate
    pub commenters: HashMap<CommentId, User>,
}

/// Board storage trait
#[trait_variant::make(BoardRepository: Send)]
pub trait LocalBoardRepository {
    /// Store a new user and return its ID
    ///
    /// No uniqueness check at this layer; callers pre-check availability
    /// via [`find_user_by_name`](Self::find_user_by_name). The two steps
    /// are not atomic, which is a documented gap of the file backend.
    async fn add_user(&self, name: &str, password_hash: &str) -> BoardResult<UserId>;

    /// Store a new post and return its ID
    async fn add_post(&self, title: &str, content: &str, poster_id: UserId)
    -> BoardResult<PostId>;

    /// Store a new comment and append its ID to the parent post's list
    async fn add_comment(
        &self,
        content: &str,
        post_id: PostId,
        poster_id: UserId,
    ) -> BoardResult<CommentId>;

    /// Point lookup by user ID
    async fn get_user(&self, id: UserId) -> BoardResult<User>;

    /// Point lookup by post ID
    async fn get_post(&self, id: PostId) -> BoardResult<Post>;

    /// Point lookup by comment ID
    async fn get_comment(&self, id: CommentId) -> BoardResult<Comment>;

    /// Point lookup by user name
    async fn find_user_by_name(&self, name: &str) -> BoardResult<User>;

    /// The full post collection, no ordering guarantee
    async fn all_posts(&self) -> BoardResult<Vec<Post>>;

    /// A page of posts, newest first
    async fn page_posts(&self, offset: i64, limit: i64) -> BoardResult<Vec<Post>>;

    /// All comments attached to a post, oldest first
    async fn all_comments_under_post(&self, post_id: PostId) -> BoardResult<Vec<Comment>>;

    /// The full aggregate for a thread page
    async fn get_post_page_data(&self, post_id: PostId) -> BoardResult<PostPage>;

    /// Release backend resources; the file backend also writes a final
    /// snapshot here
    async fn disconnect(&self) -> BoardResult<()>;
}
