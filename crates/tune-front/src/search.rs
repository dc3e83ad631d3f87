//! Search coordinator — one fetch per committed query, stale responses dropped.
//!
//! Every issued fetch gets a fresh [`FetchToken`].  Only the most recently
//! issued token may change state when it settles; anything older is a stale
//! response and is discarded without a trace in the UI.  Clearing the query
//! forgets the active token, so a fetch still in flight at that point can no
//! longer land either.

use tracing::{debug, warn};
use tune_proto::model::{SearchResponse, SearchResultSet};

use crate::catalog::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchToken(u64);

/// A fetch the caller must now perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: FetchToken,
    pub query: String,
}

/// What the UI should show for the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchView<'a> {
    /// No active query.
    Idle,
    /// A fetch for `query` is in flight.
    Loading { query: &'a str },
    /// Settled results for the active query (possibly empty).
    Ready(&'a SearchResultSet),
}

/// How a settled fetch was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Results (or the empty fallback) are now displayed.
    Applied,
    /// The token was superseded; nothing changed.
    Stale,
}

#[derive(Debug)]
struct ActiveQuery {
    token: FetchToken,
    query: String,
}

#[derive(Debug, Default)]
pub struct SearchCoordinator {
    last_token: u64,
    active: Option<ActiveQuery>,
    results: Option<SearchResultSet>,
    loading: bool,
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search for `query`.
    ///
    /// Returns the fetch to perform, or `None` when `query` is already the
    /// active query (in flight or displayed) or is blank.
    pub fn commit(&mut self, query: &str) -> Option<FetchTicket> {
        let query = query.trim();
        if query.is_empty() {
            self.clear();
            return None;
        }
        if self.active_query() == Some(query) {
            return None;
        }

        self.last_token += 1;
        let token = FetchToken(self.last_token);
        self.active = Some(ActiveQuery {
            token,
            query: query.to_string(),
        });
        self.results = None;
        self.loading = true;
        debug!("search: issued {:?} for {:?}", token, query);

        Some(FetchTicket {
            token,
            query: query.to_string(),
        })
    }

    /// Apply the outcome of the fetch identified by `token`.
    pub fn settle(
        &mut self,
        token: FetchToken,
        outcome: Result<SearchResponse, CatalogError>,
    ) -> Settled {
        let query = match &self.active {
            Some(active) if active.token == token => active.query.clone(),
            _ => {
                debug!("search: dropping stale response {:?}", token);
                return Settled::Stale;
            }
        };

        let results = match outcome {
            Ok(response) => SearchResultSet::from_response(query, response),
            Err(e) => {
                // Failures read as "no results" to the user.
                warn!("search: fetch for {:?} failed: {}", query, e);
                SearchResultSet::empty(query)
            }
        };
        debug!("search: {:?} settled with {} rows", token, results.len());
        self.results = Some(results);
        self.loading = false;
        Settled::Applied
    }

    /// Forget the active query.  Takes effect immediately: no results, not
    /// loading, and any fetch still in flight becomes stale.
    pub fn clear(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("search: cleared, abandoning {:?}", active.token);
        }
        self.results = None;
        self.loading = false;
    }

    pub fn view(&self) -> SearchView<'_> {
        match (&self.active, &self.results) {
            (None, _) => SearchView::Idle,
            (Some(active), Some(results)) if results.query == active.query => {
                SearchView::Ready(results)
            }
            (Some(active), _) => SearchView::Loading {
                query: &active.query,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn active_query(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.query.as_str())
    }

    /// Settled results for the active query, if any.
    pub fn results(&self) -> Option<&SearchResultSet> {
        match self.view() {
            SearchView::Ready(results) => Some(results),
            _ => None,
        }
    }
}
