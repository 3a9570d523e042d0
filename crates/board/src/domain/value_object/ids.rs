//! Typed entity IDs
//!
//! UUID v7 wrappers, so IDs sort by creation time.

use kernel::id::Id;

pub struct UserMarker;
pub type UserId = Id<UserMarker>;

pub struct PostMarker;
pub type PostId = Id<PostMarker>;

pub struct CommentMarker;
pub type CommentId = Id<CommentMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_v7() {
        assert_eq!(UserId::new().as_uuid().get_version_num(), 7);
        assert_eq!(PostId::new().as_uuid().get_version_num(), 7);
        assert_eq!(CommentId::new().as_uuid().get_version_num(), 7);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = uuid::Uuid::now_v7();
        let post_id = PostId::from_uuid(uuid);
        assert_eq!(post_id.as_uuid(), &uuid);
    }
}
