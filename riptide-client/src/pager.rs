//! Cursor pager: backward pagination over the thread history.
//!
//! One operation, [`CommentThread::load`]. Strictly single-flight: a call
//! arriving while a fetch is outstanding is dropped silently, not queued.

use riptide_shared::models::CommentPage;

use crate::thread::CommentThread;

impl CommentThread {
    /// Load one page of history.
    ///
    /// With `refresh = true` the thread is reset first (entries and cursor
    /// cleared, current room left so the possibly-new room id can be
    /// re-adopted) and the small history-priming page size is requested.
    /// Otherwise the configured page size is requested at the current
    /// cursor and merged in front of the existing entries.
    ///
    /// On success the continuation token replaces the cursor; a response
    /// with no token (or no `comments` array at all) exhausts pagination
    /// until the next refresh. The first response that carries a room name
    /// triggers the room join. On failure the in-flight guard is cleared
    /// and a retryable error string recorded; entries and cursor are left
    /// untouched.
    pub async fn load(&self, refresh: bool) {
        let inner = &self.inner;
        if inner.is_destroyed() {
            return;
        }

        let (limit, offset) = {
            let mut state = inner.state();

            if refresh {
                state.cursor.clear();
                state.has_more = true;
                state.entries.clear();

                if let Some(room) = state.room_id.take() {
                    self.leave_room(&room);
                }
            }

            if state.fetch_in_flight {
                return;
            }

            state.error = None;
            state.fetch_in_flight = true;

            let limit = if refresh {
                inner.config.primer_page_size
            } else {
                inner.config.page_size
            };
            (limit, state.cursor.clone())
        };
        inner.notify();

        let result = inner.api.fetch_page(inner.parent_id, limit, &offset).await;

        // A fetch started before teardown may resolve after it.
        if inner.is_destroyed() {
            return;
        }

        match result {
            Ok(page) => self.apply_page(page, refresh, &offset),
            Err(e) => {
                tracing::warn!(parent_id = %inner.parent_id, error = %e, "history fetch failed");
                let mut state = inner.state();
                state.fetch_in_flight = false;
                state.error = Some(e.to_string());
                drop(state);
                inner.notify();
            }
        }
    }

    /// Merge a fetched page into the thread.
    fn apply_page(&self, page: CommentPage, refresh: bool, offset: &str) {
        let inner = &self.inner;

        // Backfill merges must not move the user's viewport: measure before
        // the merge, compensate after.
        let anchor = (!refresh && !offset.is_empty()).then(|| inner.view.metrics());

        let mut join_room = None;
        {
            let mut state = inner.state();
            state.fetch_in_flight = false;
            state.loaded = true;
            state.has_more = true;

            if state.room_id.is_none() {
                if let Some(room) = page.socket_room_name {
                    state.room_id = Some(room.clone());
                    join_room = Some(room);
                }
            }

            let Some(comments) = page.comments else {
                // Missing array on a non-error response means "no more
                // data", not a failure.
                state.has_more = false;
                drop(state);
                inner.notify();
                if let Some(room) = join_room {
                    self.join_room(&room);
                }
                return;
            };

            let count = comments.len();
            let mut merged = comments;
            merged.append(&mut state.entries);
            state.entries = merged;

            state.cursor = page.load_previous.unwrap_or_default();
            if state.cursor.is_empty() {
                state.has_more = false;
            }

            tracing::debug!(
                parent_id = %inner.parent_id,
                merged = count,
                has_more = state.has_more,
                "history page applied"
            );
        }
        inner.notify();

        if let Some(room) = join_room {
            self.join_room(&room);
        }

        if refresh {
            inner.view.scroll_to_bottom();
        } else if let Some(anchor) = anchor {
            let after = inner.view.metrics();
            inner
                .view
                .set_scroll_top(anchor.scroll_top + after.scroll_height - anchor.scroll_height);
        }
    }
}
