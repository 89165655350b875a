//! Optimistic write coordinator.
//!
//! A submit appends a placeholder synchronously, before any network I/O, so
//! the user sees their comment immediately; the create request then either
//! replaces the placeholder with the server-confirmed entry or marks it
//! failed in place. Reconciliation scans for the placeholder's correlation
//! id rather than trusting a position: the collection may have been spliced
//! while the request was in flight.

use uuid::Uuid;

use riptide_shared::models::{AttachmentMeta, Comment, CommentStatus, CreateCommentRequest};

use crate::thread::CommentThread;

impl CommentThread {
    /// Submit a comment optimistically.
    ///
    /// No-op when both `content` and `attachment` are empty, when a write
    /// is already in flight, when writes are blocked pending an editor
    /// reset, or when nobody is logged in. The placeholder (sentinel id,
    /// `Pending`) is visible synchronously; on failure it stays in the
    /// thread as `Failed` with the error message; no automatic retry, no
    /// automatic removal.
    pub async fn submit(&self, content: &str, attachment: Option<AttachmentMeta>) {
        let inner = &self.inner;
        if inner.is_destroyed() {
            return;
        }

        if content.is_empty() && attachment.is_none() {
            return;
        }

        let Some(author) = inner.session.current_user() else {
            return;
        };

        let local_id = Uuid::new_v4();
        {
            let mut state = inner.state();
            if state.post_in_flight || state.post_blocked {
                tracing::debug!(parent_id = %inner.parent_id, "submit dropped, coordinator busy");
                return;
            }
            state.post_in_flight = true;
            state
                .entries
                .push(Comment::pending(local_id, author, content, attachment.clone()));
            state.draft.clear();
        }
        inner.notify();
        inner.view.scroll_to_bottom();

        let request = CreateCommentRequest {
            comment: content.to_string(),
            attachment,
        };
        let result = inner.api.create(inner.parent_id, request).await;

        // A create started before teardown may resolve after it.
        if inner.is_destroyed() {
            return;
        }

        let mut state = inner.state();
        state.post_in_flight = false;

        let position = state
            .entries
            .iter()
            .position(|entry| entry.local_id == Some(local_id));
        match (result, position) {
            (Ok(response), Some(index)) => {
                let mut confirmed = response.comment;
                confirmed.status = CommentStatus::Persisted;
                state.entries[index] = confirmed;
            }
            (Err(e), Some(index)) => {
                tracing::warn!(parent_id = %inner.parent_id, error = %e, "comment post failed");
                state.entries[index].status = CommentStatus::Failed(e.to_string());
            }
            // Placeholder spliced out while the request was in flight;
            // nothing left to reconcile.
            (_, None) => {}
        }
        drop(state);

        inner.notify();
        inner.view.scroll_to_bottom();
    }
}
