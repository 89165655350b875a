//! Riptide synchronization core.
//!
//! Merges three independent update sources (backward pagination, forward
//! real-time events, and locally-originated optimistic writes) into one
//! consistent, displayable comment sequence, without duplication, without
//! losing scroll position, and without racing itself.
//!
//! The view layer, the editor, identity, and the real-time transport are
//! external collaborators behind trait seams ([`ThreadView`], [`Session`],
//! [`SocketClient`], [`CommentApi`]); embedders supply implementations and
//! drive the thread through [`CommentThread`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
mod composer;
pub mod error;
mod listener;
pub mod overscroll;
mod pager;
mod rooms;
pub mod scheduler;
pub mod session;
pub mod sockets;
pub mod thread;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{CommentApi, HttpCommentApi};
pub use error::{ThreadError, ThreadResult};
pub use overscroll::OverscrollTrigger;
pub use scheduler::{Scheduler, TimerGuard, TokioScheduler};
pub use session::{Session, StaticSession};
pub use sockets::{ChannelSocketClient, SocketClient};
pub use thread::{CommentThread, ParentItem, ThreadView, ViewMetrics};
