//! Room membership sequencing.
//!
//! Join and leave are thin pass-throughs to the transport; what matters is
//! when they happen. Join fires only once a room id is known (the first
//! successful page fetch supplies it); leave fires on refresh, so the next
//! load can re-adopt a possibly-new room, and on teardown unless the thread
//! belongs to a persistent conversation context.

use crate::thread::CommentThread;

impl CommentThread {
    /// Join the given real-time room.
    pub(crate) fn join_room(&self, room: &str) {
        tracing::debug!(parent_id = %self.inner.parent_id, room, "joining room");
        self.inner.sockets.join(room);
    }

    /// Leave the given real-time room.
    pub(crate) fn leave_room(&self, room: &str) {
        tracing::debug!(parent_id = %self.inner.parent_id, room, "leaving room");
        self.inner.sockets.leave(room);
    }
}
