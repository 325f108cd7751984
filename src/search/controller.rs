/// Search/fetch controller
///
/// Owns the active query text and the current result list. All methods run on
/// the UI thread; the async parts (debounce wait, HTTP fetch) live in iced
/// tasks that report back with the [`Ticket`] they were started for.

use std::time::Duration;

use reqwest::Url;

use super::debounce::{Debouncer, Ticket};
use crate::error::LayerError;
use crate::giphy::Endpoint;

/// Outcome of handing a finished fetch to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Results replaced; carries the new item count
    Replaced(usize),
    /// A newer request superseded this one; result dropped
    Stale,
    /// Network or decode failure; previous results kept
    Failed,
}

#[derive(Debug, Clone)]
pub struct SearchController {
    query: String,
    results: Vec<Url>,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current results in server order
    pub fn results(&self) -> &[Url] {
        &self.results
    }

    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }

    /// The "TRENDING GIFS" header shows exactly while the query is empty
    pub fn header_visible(&self) -> bool {
        self.query.is_empty()
    }

    /// Record new search field text and schedule a debounced fetch for it
    pub fn update_query(&mut self, text: &str) -> Ticket {
        self.query = text.to_string();
        self.debouncer.schedule(Endpoint::for_query(text))
    }

    /// Clear the query and fetch trending immediately (cancel button, panel open)
    pub fn reset(&mut self) -> (Ticket, Endpoint) {
        self.query.clear();
        (self.debouncer.issue_now(), Endpoint::Trending)
    }

    /// Drop the query and results and supersede every outstanding ticket.
    ///
    /// The generation keeps counting, so tickets from before the clear never
    /// match a later one.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.debouncer.issue_now();
    }

    /// Debounce timer for `ticket` elapsed; returns what to fetch, if anything
    pub fn fire(&mut self, ticket: Ticket) -> Option<Endpoint> {
        self.debouncer.fire(ticket)
    }

    /// Publish a finished fetch
    pub fn apply(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Url>, LayerError>,
    ) -> Applied {
        if !self.debouncer.accepts(ticket) {
            log::debug!("Dropping stale results for {:?}", ticket);
            return Applied::Stale;
        }

        match result {
            Ok(urls) => {
                self.results = urls;
                Applied::Replaced(self.results.len())
            }
            Err(err) => {
                log::warn!("⚠️  Failed to load GIFs: {}", err);
                Applied::Failed
            }
        }
    }
}
