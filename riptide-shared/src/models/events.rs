use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Topic name of the real-time comment notification stream.
pub const TOPIC_COMMENT: &str = "comment";

/// Push notification that a comment was created somewhere on the platform.
///
/// The payload is intentionally thin: consumers filter on `parent_id` and
/// refetch the full comment by `comment_id` themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentEvent {
    /// Parent item the comment was attached to.
    pub parent_id: Uuid,
    /// Actor who posted the comment.
    pub author_id: Uuid,
    /// Identifier of the new comment.
    pub comment_id: Uuid,
}
