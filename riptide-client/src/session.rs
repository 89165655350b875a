//! Identity collaborator: who is the current actor, and are they logged in.

use riptide_shared::models::AuthorRef;

/// Current actor identity and login state.
pub trait Session: Send + Sync {
    /// Whether an actor is logged in at all.
    fn is_logged_in(&self) -> bool;

    /// Identity snapshot of the logged-in actor, `None` when logged out.
    fn current_user(&self) -> Option<AuthorRef>;
}

/// A [`Session`] fixed at construction time.
///
/// Suits embedders whose identity does not change for the lifetime of a
/// thread view; anything fancier implements the trait itself.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<AuthorRef>,
}

impl StaticSession {
    /// A session logged in as `user`.
    #[must_use]
    pub fn logged_in(user: AuthorRef) -> Self {
        Self { user: Some(user) }
    }

    /// A logged-out session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl Session for StaticSession {
    fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    fn current_user(&self) -> Option<AuthorRef> {
        self.user.clone()
    }
}
