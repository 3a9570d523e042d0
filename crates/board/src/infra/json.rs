//! JSON File-backed Store
//!
//! Holds the three collections in memory behind one reader/writer lock
//! each, with the sole durable copy being a periodic full-snapshot write
//! to a single JSON document. A background task ticks on the configured
//! interval and serializes everything under all three write locks;
//! `disconnect` stops the task and writes one final snapshot.
//!
//! The snapshot write is open-truncate-write, not crash-atomic: a crash
//! mid-write can truncate the file. Everything since the previous
//! snapshot is lost on a crash regardless, so this is accepted.
//!
//! Lock order is posts, comments, users everywhere in this module.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::entity::{comment::Comment, post::Post, user::User};
use crate::domain::repository::{BoardRepository, PostPage};
use crate::domain::value_object::ids::{CommentId, PostId, UserId};
use crate::error::{BoardError, BoardResult};

/// The persisted document: three top-level arrays
#[derive(Debug, Default, Serialize, Deserialize)]
struct Dataset {
    #[serde(rename = "Posts", default)]
    posts: Vec<Post>,
    #[serde(rename = "Comments", default)]
    comments: Vec<Comment>,
    #[serde(rename = "Users", default)]
    users: Vec<User>,
}

/// Borrowed view of the collections, serialized without cloning them
#[derive(Serialize)]
struct DatasetView<'a> {
    #[serde(rename = "Posts")]
    posts: &'a [Post],
    #[serde(rename = "Comments")]
    comments: &'a [Comment],
    #[serde(rename = "Users")]
    users: &'a [User],
}

struct Shared {
    posts: RwLock<Vec<Post>>,
    comments: RwLock<Vec<Comment>>,
    users: RwLock<Vec<User>>,
    path: PathBuf,
    stop: watch::Sender<bool>,
    saver: Mutex<Option<JoinHandle<()>>>,
}

/// JSON file-backed board store
///
/// Cloning yields another handle to the same in-memory data set.
#[derive(Clone)]
pub struct JsonDatabase {
    shared: Arc<Shared>,
}

// A poisoned lock only means some holder panicked; the collections are
// plain Vecs and stay structurally sound, so recover the guard.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl JsonDatabase {
    /// Open (or create) the snapshot file and start the save loop
    ///
    /// A missing or empty file yields empty collections.
    pub async fn connect(
        dir: impl AsRef<Path>,
        filename: &str,
        save_interval: Duration,
    ) -> BoardResult<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(filename);

        let dataset = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Dataset::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Dataset::default(),
            Err(e) => return Err(e.into()),
        };

        let (stop, stop_rx) = watch::channel(false);
        let shared = Arc::new(Shared {
            posts: RwLock::new(dataset.posts),
            comments: RwLock::new(dataset.comments),
            users: RwLock::new(dataset.users),
            path,
            stop,
            saver: Mutex::new(None),
        });

        let handle = tokio::spawn(save_loop(
            shared.clone(),
            save_interval,
            stop_rx,
        ));
        *shared
            .saver
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        Ok(Self { shared })
    }

    /// Path of the backing snapshot file
    pub fn snapshot_path(&self) -> &Path {
        &self.shared.path
    }

    /// Serialize everything to the snapshot file now
    pub fn snapshot(&self) -> BoardResult<()> {
        self.shared.snapshot()
    }
}

impl Shared {
    fn snapshot(&self) -> BoardResult<()> {
        // Write locks on all three collections give the serializer a
        // consistent point-in-time view.
        let posts = write_lock(&self.posts);
        let comments = write_lock(&self.comments);
        let users = write_lock(&self.users);
        let view = DatasetView {
            posts: posts.as_slice(),
            comments: comments.as_slice(),
            users: users.as_slice(),
        };
        let bytes = serde_json::to_vec(&view)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

async fn save_loop(shared: Arc<Shared>, interval: Duration, mut stop: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately; consume
    // it so the loop waits a full period before the first write.
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = stop.changed() => return,
            _ = ticker.tick() => {
                tracing::info!("writing board snapshot");
                if let Err(e) = shared.snapshot() {
                    tracing::error!(error = %e, "snapshot write failed");
                }
            }
        }
    }
}

impl BoardRepository for JsonDatabase {
    async fn add_user(&self, name: &str, password_hash: &str) -> BoardResult<UserId> {
        let user = User::new(name, password_hash);
        let id = user.id;
        // Name uniqueness is the caller's pre-check; two concurrent
        // sign-ups racing the same name can both land here.
        write_lock(&self.shared.users).push(user);
        Ok(id)
    }

    async fn add_post(
        &self,
        title: &str,
        content: &str,
        poster_id: UserId,
    ) -> BoardResult<PostId> {
        let post = Post::new(title, content, poster_id);
        let id = post.id;
        write_lock(&self.shared.posts).push(post);
        Ok(id)
    }

    async fn add_comment(
        &self,
        content: &str,
        post_id: PostId,
        poster_id: UserId,
    ) -> BoardResult<CommentId> {
        // Both write locks for the whole operation, so the comment and
        // the parent's id list cannot be observed half-applied by other
        // writers. Readers of a single collection may still interleave.
        let mut posts = write_lock(&self.shared.posts);
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(BoardError::PostNotFound)?;
        let mut comments = write_lock(&self.shared.comments);

        let comment = Comment::new(content, post_id, poster_id);
        let id = comment.id;
        comments.push(comment);
        post.comment_ids.push(id);
        Ok(id)
    }

    async fn get_user(&self, id: UserId) -> BoardResult<User> {
        read_lock(&self.shared.users)
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(BoardError::UserNotFound)
    }

    async fn get_post(&self, id: PostId) -> BoardResult<Post> {
        read_lock(&self.shared.posts)
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(BoardError::PostNotFound)
    }

    async fn get_comment(&self, id: CommentId) -> BoardResult<Comment> {
        read_lock(&self.shared.comments)
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(BoardError::CommentNotFound)
    }

    async fn find_user_by_name(&self, name: &str) -> BoardResult<User> {
        read_lock(&self.shared.users)
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or(BoardError::UserNotFoundByName)
    }

    async fn all_posts(&self) -> BoardResult<Vec<Post>> {
        Ok(read_lock(&self.shared.posts).clone())
    }

    async fn page_posts(&self, offset: i64, limit: i64) -> BoardResult<Vec<Post>> {
        let mut posts = read_lock(&self.shared.posts).clone();
        posts.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn all_comments_under_post(&self, post_id: PostId) -> BoardResult<Vec<Comment>> {
        Ok(read_lock(&self.shared.comments)
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn get_post_page_data(&self, post_id: PostId) -> BoardResult<PostPage> {
        let post = self.get_post(post_id).await?;

        let comments_guard = read_lock(&self.shared.comments);
        let users = read_lock(&self.shared.users);

        let poster = users
            .iter()
            .find(|u| u.id == post.poster_id)
            .cloned()
            .ok_or(BoardError::UserNotFound)?;
        let poster = if poster.deleted {
            User::deleted_sentinel()
        } else {
            poster
        };

        // Walking the post's id list keeps comments in insertion order,
        // which is chronological ascending.
        let mut comments = Vec::with_capacity(post.comment_ids.len());
        let mut commenters = std::collections::HashMap::new();
        for comment_id in &post.comment_ids {
            let Some(comment) = comments_guard.iter().find(|c| c.id == *comment_id) else {
                // A listed id with no comment record means we raced a
                // writer; leave it out rather than failing the page.
                continue;
            };
            let commenter = users
                .iter()
                .find(|u| u.id == comment.poster_id)
                .filter(|u| !u.deleted)
                .cloned()
                .unwrap_or_else(User::deleted_sentinel);
            commenters.insert(comment.id, commenter);
            comments.push(comment.clone());
        }

        Ok(PostPage {
            post,
            poster,
            comments,
            commenters,
        })
    }

    async fn disconnect(&self) -> BoardResult<()> {
        // Stop the save loop first so it cannot interleave with the
        // final write.
        let _ = self.shared.stop.send(true);
        let handle = self
            .shared
            .saver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "snapshot task did not shut down cleanly");
            }
        }
        self.shared.snapshot()
    }
}
