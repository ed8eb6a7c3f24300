//! Monotonic request stamping.
//!
//! The tutor endpoints are never cancelled, so a response can arrive after
//! a newer request of the same kind was issued. Flows stamp each request
//! with a ticket and drop completions whose ticket is no longer current,
//! instead of letting a stale response overwrite fresher state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues tickets for one kind of request. Clones share the counter.
#[derive(Clone, Debug, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

/// Proof of which request a completion belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request, invalidating all earlier tickets.
    #[must_use]
    pub fn begin(&self) -> RequestTicket {
        let seq = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        RequestTicket { seq }
    }

    /// True while no newer request has been issued since the ticket.
    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.seq
    }
}
