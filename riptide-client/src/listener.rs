//! Live update listener: the forward real-time path into the thread.
//!
//! One standing subscription to the global `comment` topic, established at
//! attach and torn down exactly once in `destroy`, independent of room
//! membership, which only scopes what the server emits. Every event is
//! filtered client-side against the thread's parent.

use std::sync::Arc;

use tokio::sync::broadcast;

use riptide_shared::models::CommentEvent;

use crate::thread::{CommentThread, Inner};

impl CommentThread {
    /// Start the standing subscription to the `comment` event stream.
    ///
    /// Matching events trigger a single-item fetch for the identified
    /// comment, which is appended to the tail. Self-originated events are
    /// suppressed (the optimistic path already reflected them); events for
    /// other parents, and events whose comment no longer exists by the time
    /// the fetch resolves, are dropped silently.
    ///
    /// Calling `listen` again replaces the subscription; the previous task
    /// is aborted so at most one is ever live.
    pub fn listen(&self) {
        tracing::debug!(
            parent_id = %self.inner.parent_id,
            topic = riptide_shared::models::events::TOPIC_COMMENT,
            "subscribing to comment events"
        );
        let receiver = self.inner.sockets.subscribe();
        let weak = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            let mut receiver = receiver;
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "comment event stream lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let Some(inner) = weak.upgrade() else { break };
                if inner.is_destroyed() {
                    break;
                }
                apply_event(&inner, event).await;
            }
        });

        let mut slot = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

async fn apply_event(inner: &Arc<Inner>, event: CommentEvent) {
    if event.parent_id != inner.parent_id {
        return;
    }

    // Own writes arrive through the optimistic path; applying the event
    // too would duplicate the entry.
    if inner.session.is_logged_in() {
        if let Some(user) = inner.session.current_user() {
            if user.id == event.author_id {
                return;
            }
        }
    }

    let page = match inner
        .api
        .fetch_page(inner.parent_id, 1, &event.comment_id.to_string())
        .await
    {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!(comment_id = %event.comment_id, error = %e, "event fetch failed");
            return;
        }
    };

    if inner.is_destroyed() {
        return;
    }

    // Comment may have been deleted between the event and the fetch.
    let Some(mut comments) = page.comments else {
        return;
    };
    if comments.is_empty() {
        return;
    }
    let comment = comments.remove(0);

    // Only force-scroll if the user was already at the bottom; never yank
    // them out of the history they scrolled up to read.
    let was_at_bottom = inner.view.metrics().at_bottom();

    inner.state().entries.push(comment);
    inner.notify();

    if was_at_bottom {
        inner.view.scroll_to_bottom();
    }
}
