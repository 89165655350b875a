//! Real-time transport collaborator.
//!
//! Room membership only scopes what the server pushes; the `comment` event
//! stream itself is global and every consumer filters client-side. Join and
//! leave are idempotent fire-and-forget.

use tokio::sync::broadcast;

use riptide_shared::models::CommentEvent;

/// Channel capacity for the in-process event fan-out. Events are tiny and
/// consumers refetch by id, so lagging receivers lose nothing durable.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Room-scoped publish/subscribe primitives.
pub trait SocketClient: Send + Sync {
    /// Join a real-time room. Idempotent, fire-and-forget.
    fn join(&self, room: &str);

    /// Leave a real-time room. Idempotent, fire-and-forget.
    fn leave(&self, room: &str);

    /// Subscribe to the global `comment` event stream.
    fn subscribe(&self) -> broadcast::Receiver<CommentEvent>;
}

/// In-process [`SocketClient`] backed by a tokio broadcast channel.
///
/// Embedders bridge their actual transport by publishing decoded events into
/// [`ChannelSocketClient::publish`]; tests drive it directly.
#[derive(Debug)]
pub struct ChannelSocketClient {
    sender: broadcast::Sender<CommentEvent>,
}

impl ChannelSocketClient {
    /// Create a client with an empty event stream.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish a comment event to all subscribers.
    pub fn publish(&self, event: CommentEvent) {
        // Send only fails when nobody is subscribed, which is fine.
        let _ = self.sender.send(event);
    }
}

impl Default for ChannelSocketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketClient for ChannelSocketClient {
    fn join(&self, room: &str) {
        tracing::debug!(room, "joining socket room");
    }

    fn leave(&self, room: &str) {
        tracing::debug!(room, "leaving socket room");
    }

    fn subscribe(&self) -> broadcast::Receiver<CommentEvent> {
        self.sender.subscribe()
    }
}
