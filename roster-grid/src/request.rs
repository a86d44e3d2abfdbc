//! Request generations
//!
//! Every remote fetch gets a ticket. Only the newest ticket that has not
//! been cancelled may deliver its rows; anything older is stale.

use log::warn;

use roster_lib::filter::FilterState;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    pub generation: u64,
    pub criteria: FilterState,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generation: u64,
    latest: Option<RequestTicket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&mut self, criteria: FilterState) -> RequestTicket {
        self.generation += 1;
        let ticket = RequestTicket {
            generation: self.generation,
            criteria,
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    /// Whether a response for `ticket` may be applied. Accepting retires
    /// the ticket, so a duplicate delivery is rejected.
    pub fn accept(&mut self, ticket: &RequestTicket) -> bool {
        if self.latest.as_ref() == Some(ticket) {
            self.latest = None;
            return true;
        }
        warn!(
            "dropping stale response (generation {}, latest {})",
            ticket.generation, self.generation
        );
        false
    }

    /// Invalidates the outstanding ticket, if any.
    pub fn cancel(&mut self) {
        self.latest = None;
    }

    pub fn in_flight(&self) -> bool {
        self.latest.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_accepted() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(FilterState::new().with("name", "김"));
        let second = tracker.issue(FilterState::new().with("name", "김철"));

        assert!(!tracker.accept(&first));
        assert!(tracker.accept(&second));
        assert!(!tracker.accept(&second));
    }

    #[test]
    fn test_cancel_rejects_late_response() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(FilterState::new());
        assert!(tracker.in_flight());
        tracker.cancel();
        assert!(!tracker.accept(&ticket));
        assert!(!tracker.in_flight());
    }
}
