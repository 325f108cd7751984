/// Single-slot debounce for search requests
///
/// Every scheduled request gets a [`Ticket`] carrying a generation number.
/// Scheduling a new request bumps the generation, which both cancels the
/// pending timer (its `fire` returns `None`) and invalidates any fetch that is
/// already in flight (its result is no longer `accepts`-ed).

use std::time::Duration;

use crate::giphy::Endpoint;

/// Generation stamp of one scheduled request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<(Ticket, Endpoint)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule a request, superseding whatever was pending or in flight
    pub fn schedule(&mut self, endpoint: Endpoint) -> Ticket {
        let ticket = self.next_ticket();
        self.pending = Some((ticket, endpoint));
        ticket
    }

    /// Supersede everything and hand out a ticket for a request issued right
    /// away, without waiting for the quiet period
    pub fn issue_now(&mut self) -> Ticket {
        self.pending = None;
        self.next_ticket()
    }

    /// Called when a ticket's timer elapses.
    ///
    /// Returns the endpoint to fetch only for the latest ticket, and only once.
    pub fn fire(&mut self, ticket: Ticket) -> Option<Endpoint> {
        match &self.pending {
            Some((pending, _)) if *pending == ticket => {
                self.pending.take().map(|(_, endpoint)| endpoint)
            }
            _ => None,
        }
    }

    /// Whether a fetch started for `ticket` may still publish its result
    pub fn accepts(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn next_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }
}

/// Sleep for the quiet period, then hand the ticket back
pub async fn wait(ticket: Ticket, delay: Duration) -> Ticket {
    tokio::time::sleep(delay).await;
    ticket
}
