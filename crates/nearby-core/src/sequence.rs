//! # Request Sequencing
//!
//! Latest-request-wins bookkeeping for a single flow.
//!
//! ## Stale Response Discard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Out-of-order responses                               │
//! │                                                                         │
//! │  select c2 ── issue() ─► Ticket #1 ───── GET /markets/category/c2 ──┐  │
//! │  select c3 ── issue() ─► Ticket #2 ── GET /markets/category/c3 ─┐   │  │
//! │                                                                  │   │  │
//! │                                      response #2 ◄───────────────┘   │  │
//! │                                      is_current(#2)? yes → apply     │  │
//! │                                                                      │  │
//! │                                      response #1 ◄───────────────────┘  │
//! │                                      is_current(#1)? no  → discard      │
//! │                                                                         │
//! │  close() on unmount: is_current() is false for every ticket.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Proof that a request was issued; compared against the sequencer on
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Sequence number of this ticket (starts at 1).
    #[inline]
    pub fn seq(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-flow monotonically increasing request counter.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
    closed: bool,
}

impl RequestSequencer {
    /// Creates an open sequencer with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket. Every earlier ticket becomes stale.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns true if a response carrying `ticket` may be applied.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed && ticket.0 == self.issued
    }

    /// Stops accepting responses for good.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Returns true after [`close`](Self::close).
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of tickets issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_is_current() {
        let mut seq = RequestSequencer::new();
        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
        assert_eq!(seq.issued(), 2);
    }

    #[test]
    fn test_close_discards_everything() {
        let mut seq = RequestSequencer::new();
        let ticket = seq.issue();
        seq.close();

        assert!(seq.is_closed());
        assert!(!seq.is_current(ticket));
        let late = seq.issue();
        assert!(!seq.is_current(late));
    }
}
