//! PostgreSQL Store
//!
//! The same contract as the JSON store, against a connection pool. The
//! schema is bootstrapped on connect; there is no migration tooling.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::domain::entity::{comment::Comment, post::Post, user::User};
use crate::domain::repository::{BoardRepository, PostPage};
use crate::domain::value_object::ids::{CommentId, PostId, UserId};
use crate::error::{BoardError, BoardResult};

const CREATE_POSTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id            uuid PRIMARY KEY,
    title         text NOT NULL,
    content       text NOT NULL,
    poster_id     uuid NOT NULL,
    comment_ids   uuid[] NOT NULL DEFAULT '{}',
    date_created  timestamptz NOT NULL
)"#;

const CREATE_COMMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    id            uuid PRIMARY KEY,
    content       text NOT NULL,
    post_id       uuid NOT NULL,
    poster_id     uuid NOT NULL,
    date_created  timestamptz NOT NULL,
    deleted       boolean NOT NULL DEFAULT false
)"#;

// The UNIQUE constraint on name is the backstop for the frontend's
// non-atomic check-then-insert; a raced duplicate insert affects zero
// rows and surfaces as RowsAffectedMismatch.
const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            uuid PRIMARY KEY,
    name          text NOT NULL UNIQUE,
    password      text NOT NULL,
    date_joined   timestamptz NOT NULL,
    deleted       boolean NOT NULL DEFAULT false
)"#;

// Sessions live in process memory; the table is bootstrapped for schema
// parity with deployments that persist them.
const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    token         text PRIMARY KEY,
    user_id       uuid NOT NULL,
    expiry        timestamptz NOT NULL
)"#;

const CREATE_TABLES: [&str; 4] = [
    CREATE_POSTS_TABLE,
    CREATE_COMMENTS_TABLE,
    CREATE_USERS_TABLE,
    CREATE_SESSIONS_TABLE,
];

/// PostgreSQL-backed board store
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    /// Connect the pool and bootstrap the schema if absent
    pub async fn connect(database_url: &str) -> BoardResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        for statement in CREATE_TABLES {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Build from an existing pool (tests, shared pools)
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn expect_one_row(affected: u64) -> BoardResult<()> {
        if affected != 1 {
            return Err(BoardError::RowsAffectedMismatch {
                expected: 1,
                actual: affected,
            });
        }
        Ok(())
    }
}

impl BoardRepository for PgBoardRepository {
    async fn add_user(&self, name: &str, password_hash: &str) -> BoardResult<UserId> {
        let user = User::new(name, password_hash);

        let affected = sqlx::query(
            r#"
            INSERT INTO users (id, name, password, date_joined, deleted)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.password)
        .bind(user.date_joined)
        .bind(user.deleted)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Self::expect_one_row(affected)?;
        Ok(user.id)
    }

    async fn add_post(
        &self,
        title: &str,
        content: &str,
        poster_id: UserId,
    ) -> BoardResult<PostId> {
        let post = Post::new(title, content, poster_id);

        let affected = sqlx::query(
            r#"
            INSERT INTO posts (id, title, content, poster_id, comment_ids, date_created)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(*post.id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(*post.poster_id.as_uuid())
        .bind(Vec::<Uuid>::new())
        .bind(post.date_created)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Self::expect_one_row(affected)?;
        Ok(post.id)
    }

    async fn add_comment(
        &self,
        content: &str,
        post_id: PostId,
        poster_id: UserId,
    ) -> BoardResult<CommentId> {
        let comment = Comment::new(content, post_id, poster_id);

        // One transaction for the pair, so a failure of either statement
        // leaves no partial state.
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            INSERT INTO comments (id, content, post_id, poster_id, date_created, deleted)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(*comment.id.as_uuid())
        .bind(&comment.content)
        .bind(*comment.post_id.as_uuid())
        .bind(*comment.poster_id.as_uuid())
        .bind(comment.date_created)
        .bind(comment.deleted)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        Self::expect_one_row(affected)?;

        let affected = sqlx::query(
            "UPDATE posts SET comment_ids = array_append(comment_ids, $1) WHERE id = $2",
        )
        .bind(*comment.id.as_uuid())
        .bind(*post_id.as_uuid())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if affected == 0 {
            return Err(BoardError::PostNotFound);
        }

        tx.commit().await?;
        Ok(comment.id)
    }

    async fn get_user(&self, id: UserId) -> BoardResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, password, date_joined, deleted FROM users WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).ok_or(BoardError::UserNotFound)
    }

    async fn get_post(&self, id: PostId) -> BoardResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, poster_id, comment_ids, date_created
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PostRow::into_post).ok_or(BoardError::PostNotFound)
    }

    async fn get_comment(&self, id: CommentId) -> BoardResult<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, content, post_id, poster_id, date_created, deleted
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CommentRow::into_comment)
            .ok_or(BoardError::CommentNotFound)
    }

    async fn find_user_by_name(&self, name: &str) -> BoardResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, password, date_joined, deleted FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user)
            .ok_or(BoardError::UserNotFoundByName)
    }

    async fn all_posts(&self) -> BoardResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, poster_id, comment_ids, date_created FROM posts",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn page_posts(&self, offset: i64, limit: i64) -> BoardResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, poster_id, comment_ids, date_created
            FROM posts
            ORDER BY date_created DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    async fn all_comments_under_post(&self, post_id: PostId) -> BoardResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, content, post_id, poster_id, date_created, deleted
            FROM comments
            WHERE post_id = $1
            ORDER BY date_created ASC
            "#,
        )
        .bind(*post_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    // Three batched queries instead of one per comment. A single joined
    // query would be preferable once this backend matures.
    async fn get_post_page_data(&self, post_id: PostId) -> BoardResult<PostPage> {
        let post = self.get_post(post_id).await?;

        let poster = self.get_user(post.poster_id).await?;
        let poster = if poster.deleted {
            User::deleted_sentinel()
        } else {
            poster
        };

        let comment_uuids: Vec<Uuid> = post.comment_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, content, post_id, poster_id, date_created, deleted
            FROM comments
            WHERE id = ANY($1)
            ORDER BY date_created ASC
            "#,
        )
        .bind(&comment_uuids)
        .fetch_all(&self.pool)
        .await?;
        let comments: Vec<Comment> = rows.into_iter().map(CommentRow::into_comment).collect();

        let mut author_uuids: Vec<Uuid> =
            comments.iter().map(|c| *c.poster_id.as_uuid()).collect();
        author_uuids.sort_unstable();
        author_uuids.dedup();

        let author_rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, password, date_joined, deleted FROM users WHERE id = ANY($1)",
        )
        .bind(&author_uuids)
        .fetch_all(&self.pool)
        .await?;
        let authors: HashMap<UserId, User> = author_rows
            .into_iter()
            .map(UserRow::into_user)
            .map(|u| (u.id, u))
            .collect();

        let mut commenters = HashMap::with_capacity(comments.len());
        for comment in &comments {
            let commenter = authors
                .get(&comment.poster_id)
                .filter(|u| !u.deleted)
                .cloned()
                .unwrap_or_else(User::deleted_sentinel);
            commenters.insert(comment.id, commenter);
        }

        Ok(PostPage {
            post,
            poster,
            comments,
            commenters,
        })
    }

    async fn disconnect(&self) -> BoardResult<()> {
        self.pool.close().await;
        Ok(())
    }
}

// ============================================================================
// Row types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    password: String,
    date_joined: DateTime<Utc>,
    deleted: bool,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            password: self.password,
            date_joined: self.date_joined,
            deleted: self.deleted,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    poster_id: Uuid,
    comment_ids: Vec<Uuid>,
    date_created: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: PostId::from_uuid(self.id),
            title: self.title,
            content: self.content,
            poster_id: UserId::from_uuid(self.poster_id),
            comment_ids: self
                .comment_ids
                .into_iter()
                .map(CommentId::from_uuid)
                .collect(),
            date_created: self.date_created,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    content: String,
    post_id: Uuid,
    poster_id: Uuid,
    date_created: DateTime<Utc>,
    deleted: bool,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::from_uuid(self.id),
            content: self.content,
            post_id: PostId::from_uuid(self.post_id),
            poster_id: UserId::from_uuid(self.poster_id),
            date_created: self.date_created,
            deleted: self.deleted,
        }
    }
}
