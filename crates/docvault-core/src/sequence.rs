//! Ordering guard for overlapping requests.
//!
//! API calls complete in whatever order the network delivers them, so a
//! caller that applies each response as it arrives ends up showing the
//! last response to *finish*, not the last one *asked for*. That is the
//! default behavior of this crate.
//!
//! `RequestSequence` is the opt-in alternative: take a ticket before each
//! request and only apply the response if its ticket is still the newest
//! one issued.

use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a request in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a request about to be sent
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no newer request has been issued since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
