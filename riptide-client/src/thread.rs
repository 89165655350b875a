//! Shared thread state, the observer contract, and lifecycle.
//!
//! [`CommentThread`] owns the one ordered collection every component reads
//! and mutates. The merge discipline is what keeps unsynchronized
//! interleaving safe: backfill only ever prepends at the head, live and
//! optimistic entries only ever append at the tail, and nothing reorders.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use uuid::Uuid;

use riptide_shared::ThreadConfig;
use riptide_shared::models::{AuthorRef, Comment};

use crate::api::CommentApi;
use crate::session::Session;
use crate::sockets::SocketClient;

/// The content item a thread hangs off.
///
/// Sub-entities (e.g. a remind of a post) comment against their ancestor,
/// so the thread parent is the entity id when one is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentItem {
    /// The item's own id.
    pub id: Uuid,
    /// Ancestor entity id when the item is itself a sub-entity.
    pub entity_id: Option<Uuid>,
}

impl ParentItem {
    /// The id comments attach to.
    #[must_use]
    pub fn thread_parent(&self) -> Uuid {
        self.entity_id.unwrap_or(self.id)
    }
}

/// Viewport measurements the scroll-preservation logic works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMetrics {
    /// Current scroll offset from the top.
    pub scroll_top: f64,
    /// Total content height.
    pub scroll_height: f64,
    /// Visible viewport height.
    pub client_height: f64,
}

impl ViewMetrics {
    /// Whether the viewport is scrolled to the bottom of the content.
    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height
    }
}

/// Observer half of the view contract.
///
/// The thread invokes `thread_changed` once per discrete mutation group
/// (one per fetch resolution, one per append, one per status change) and
/// drives scrolling through the explicit commands below; it never touches
/// any rendering framework directly.
pub trait ThreadView: Send + Sync {
    /// The ordered sequence (or a flag/error on it) changed.
    fn thread_changed(&self);

    /// Scroll the viewport to the newest entry.
    fn scroll_to_bottom(&self);

    /// Measure the viewport.
    fn metrics(&self) -> ViewMetrics;

    /// Set the viewport's scroll offset (anchor compensation on backfill).
    fn set_scroll_top(&self, offset: f64);
}

/// Mutable per-thread state, exclusively owned by [`CommentThread`].
#[derive(Debug, Default)]
pub(crate) struct ThreadState {
    /// Ordered entries, oldest first, newest last.
    pub entries: Vec<Comment>,
    /// Opaque backward-pagination token, empty until the first response.
    pub cursor: String,
    /// True until a response carries no continuation token.
    pub has_more: bool,
    /// Real-time room, unknown until the first page supplies it.
    pub room_id: Option<String>,
    /// Single-flight guard for pagination fetches.
    pub fetch_in_flight: bool,
    /// Single-flight guard for optimistic writes.
    pub post_in_flight: bool,
    /// Writes blocked pending an editor state reset (attachment upload).
    pub post_blocked: bool,
    /// Whether the first load has completed.
    pub loaded: bool,
    /// Human-readable error from the last failed fetch, if any.
    pub error: Option<String>,
    /// The input buffer the write coordinator clears on submit.
    pub draft: String,
}

pub(crate) struct Inner {
    pub parent_id: Uuid,
    pub conversation: bool,
    pub config: ThreadConfig,
    pub api: Arc<dyn CommentApi>,
    pub session: Arc<dyn Session>,
    pub sockets: Arc<dyn SocketClient>,
    pub view: Arc<dyn ThreadView>,
    pub state: Mutex<ThreadState>,
    pub destroyed: AtomicBool,
    pub listener: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    /// Lock the state, recovering from poisoning: every mutation here is a
    /// small invariant-preserving group, so the data stays usable.
    pub(crate) fn state(&self) -> MutexGuard<'_, ThreadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn notify(&self) {
        self.view.thread_changed();
    }
}

/// A live, incrementally-loaded comment thread attached to one parent item.
///
/// Cheap to clone; all clones share the same state. Mutating operations
/// live in the component modules: `load` (pager), `listen` (live updates),
/// `submit` (optimistic writes), room join/leave sequencing.
#[derive(Clone)]
pub struct CommentThread {
    pub(crate) inner: Arc<Inner>,
}

impl fmt::Debug for CommentThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentThread")
            .field("parent_id", &self.inner.parent_id)
            .field("conversation", &self.inner.conversation)
            .finish()
    }
}

impl CommentThread {
    /// Attach a thread to `parent`.
    ///
    /// `conversation` marks the thread as belonging to a persistent
    /// conversation context: room membership then outlives this view and
    /// teardown skips the room leave.
    #[must_use]
    pub fn new(
        parent: &ParentItem,
        conversation: bool,
        config: ThreadConfig,
        api: Arc<dyn CommentApi>,
        session: Arc<dyn Session>,
        sockets: Arc<dyn SocketClient>,
        view: Arc<dyn ThreadView>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                parent_id: parent.thread_parent(),
                conversation,
                config,
                api,
                session,
                sockets,
                view,
                state: Mutex::new(ThreadState::default()),
                destroyed: AtomicBool::new(false),
                listener: Mutex::new(None),
            }),
        }
    }

    /// The id comments of this thread attach to.
    #[must_use]
    pub fn parent_id(&self) -> Uuid {
        self.inner.parent_id
    }

    /// The injected configuration this thread runs with.
    #[must_use]
    pub fn config(&self) -> &ThreadConfig {
        &self.inner.config
    }

    /// Snapshot of the ordered entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Comment> {
        self.inner.state().entries.clone()
    }

    /// Whether older history may still exist.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.inner.state().has_more
    }

    /// Whether the first load has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.state().loaded
    }

    /// The adopted real-time room, if known yet.
    #[must_use]
    pub fn room_id(&self) -> Option<String> {
        self.inner.state().room_id.clone()
    }

    /// Human-readable error from the last failed fetch.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state().error.clone()
    }

    /// Current input buffer.
    #[must_use]
    pub fn draft(&self) -> String {
        self.inner.state().draft.clone()
    }

    /// Replace the input buffer.
    pub fn set_draft(&self, draft: impl Into<String>) {
        self.inner.state().draft = draft.into();
    }

    /// Prefix the input buffer with an `@username` mention.
    pub fn reply_to(&self, author: &AuthorRef) {
        let mut state = self.inner.state();
        state.draft = format!("@{} {}", author.username, state.draft);
        drop(state);
        self.inner.notify();
    }

    /// Whether a submit would currently be accepted.
    #[must_use]
    pub fn post_enabled(&self, has_attachment: bool) -> bool {
        let state = self.inner.state();
        !state.post_in_flight
            && !state.post_blocked
            && (!state.draft.is_empty() || has_attachment)
    }

    /// Gate writes while the editor resets (e.g. an attachment upload is in
    /// progress). Writes attempted while blocked are dropped.
    pub fn set_post_blocked(&self, blocked: bool) {
        self.inner.state().post_blocked = blocked;
    }

    /// Splice an entry out of the thread (delete action from the view).
    /// Out-of-range indices are ignored.
    pub fn remove_entry(&self, index: usize) {
        let mut state = self.inner.state();
        if index >= state.entries.len() {
            return;
        }
        state.entries.remove(index);
        drop(state);
        self.inner.notify();
    }

    /// Replace an entry in place (edit completion from the view; edits
    /// replace by position). Out-of-range indices are ignored.
    pub fn replace_entry(&self, index: usize, comment: Comment) {
        let mut state = self.inner.state();
        let Some(slot) = state.entries.get_mut(index) else {
            return;
        };
        *slot = comment;
        drop(state);
        self.inner.notify();
    }

    /// Avatar URL for the current actor.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        let user = self.inner.session.current_user();
        self.inner.config.avatar_url(user.as_ref())
    }

    /// Whether this thread has been torn down.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_destroyed()
    }

    /// Tear the thread down: cancel the live subscription exactly once,
    /// and leave the room unless the thread is in conversation mode.
    ///
    /// In-flight fetches started before teardown may still complete; they
    /// detect the destroyed flag and no-op. Calling `destroy` again is a
    /// no-op as well.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        // The subscription must die regardless of conversation mode; a leak
        // here keeps appending to a thread nobody is showing.
        if let Some(handle) = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }

        let room = self.inner.state().room_id.clone();
        if let Some(room) = room {
            if !self.inner.conversation {
                self.leave_room(&room);
            }
        }

        tracing::debug!(parent_id = %self.inner.parent_id, "thread destroyed");
    }
}
