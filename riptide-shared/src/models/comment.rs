use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity snapshot of the actor who posted a comment.
///
/// Carries enough display state to render the entry without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorRef {
    /// Unique identifier of the posting actor.
    pub id: Uuid,
    /// Username snapshot at post time.
    pub username: String,
    /// Avatar cache-busting token, advanced whenever the avatar changes.
    #[serde(default)]
    pub icon_time: i64,
}

/// Structured reference to an uploaded attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentMeta {
    /// Server-side identifier of the uploaded blob.
    pub attachment_guid: Uuid,
    /// Media kind, e.g. `"image"` or `"video"`.
    pub kind: String,
    /// Preview URL when the upload pipeline produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// Confirmation state of a thread entry.
///
/// `Pending` and `Failed` only ever apply to locally-originated entries
/// awaiting (or denied) server confirmation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state", content = "error")]
pub enum CommentStatus {
    /// Confirmed by the server.
    #[default]
    Persisted,
    /// Optimistically appended, create request still in flight.
    Pending,
    /// Create request failed; the message is kept for the user to see.
    Failed(String),
}

/// A single entry in a comment thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// Server-assigned identifier. [`Uuid::nil`] is the reserved sentinel
    /// for "not yet persisted".
    pub id: Uuid,

    /// Locally generated correlation handle, set only on optimistic entries
    /// so reconciliation can find them after the collection mutated.
    #[serde(skip)]
    pub local_id: Option<Uuid>,

    /// Identity of the posting actor.
    pub author: AuthorRef,

    /// Text content.
    pub body: String,

    /// Optional attachment reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentMeta>,

    /// Seconds since the Unix epoch.
    pub created_at: i64,

    /// Confirmation state; the wire never carries anything but `Persisted`.
    #[serde(skip)]
    pub status: CommentStatus,
}

impl Comment {
    /// Builds the optimistic placeholder for a local write: sentinel id,
    /// fresh correlation handle, `Pending` status, current wall-clock time.
    #[must_use]
    pub fn pending(
        local_id: Uuid,
        author: AuthorRef,
        body: impl Into<String>,
        attachment: Option<AttachmentMeta>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            local_id: Some(local_id),
            author,
            body: body.into(),
            attachment,
            created_at: Utc::now().timestamp(),
            status: CommentStatus::Pending,
        }
    }

    /// Whether this entry still carries the "not yet persisted" sentinel id.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.id.is_nil()
    }
}
