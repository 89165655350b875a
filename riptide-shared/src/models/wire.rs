use serde::{Deserialize, Serialize};

use super::comment::{AttachmentMeta, Comment};

/// One page of the backward history feed.
///
/// `comments` being absent on a non-error response means the feed is
/// exhausted, not that the request failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentPage {
    /// Page slice, oldest first. Absent or empty means no more data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,

    /// Opaque continuation token for the next (older) page.
    #[serde(
        rename = "load-previous",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub load_previous: Option<String>,

    /// Real-time channel for this thread, supplied on the first page.
    #[serde(
        rename = "socketRoomName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub socket_room_name: Option<String>,
}

/// Body of the create-comment request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCommentRequest {
    /// Text content.
    pub comment: String,

    /// Attachment metadata, flattened into the body the way the upload
    /// subsystem exports it.
    #[serde(flatten)]
    pub attachment: Option<AttachmentMeta>,
}

/// Response of the create-comment request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCommentResponse {
    /// The server-confirmed comment.
    pub comment: Comment,
}
