pub mod comment;
pub mod events;
pub mod wire;

pub use comment::{AttachmentMeta, AuthorRef, Comment, CommentStatus};
pub use events::CommentEvent;
pub use wire::{CommentPage, CreateCommentRequest, CreateCommentResponse};
