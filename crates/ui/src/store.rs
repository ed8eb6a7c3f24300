use dioxus::prelude::*;

use imagier_core::model::{ChatMessage, Session, SessionPatch};

/// The single source of truth for the current learning session, shared by
/// all flows through context. Flows write through [`apply`] and
/// [`push_message`]; the signal makes any view reading a snapshot
/// re-render on change.
///
/// [`apply`]: SessionStore::apply
/// [`push_message`]: SessionStore::push_message
#[derive(Clone, Copy, PartialEq)]
pub struct SessionStore {
    inner: Signal<Session>,
}

impl SessionStore {
    #[must_use]
    pub fn new(inner: Signal<Session>) -> Self {
        Self { inner }
    }

    /// Tracked snapshot: reading inside a component subscribes it.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }

    /// Untracked snapshot for event handlers and effects that must not
    /// re-run on session changes.
    #[must_use]
    pub fn peek(&self) -> Session {
        self.inner.peek().clone()
    }

    /// Merge-update: overlays the provided fields, leaves the rest.
    pub fn apply(&mut self, patch: SessionPatch) {
        self.inner.with_mut(|session| session.apply(patch));
    }

    /// Append a chat turn onto the *latest* session. Mutating in place
    /// under the signal lock means an optimistic user message written a
    /// moment ago is never lost to a stale snapshot.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.inner.with_mut(|session| session.push_message(message));
    }
}
