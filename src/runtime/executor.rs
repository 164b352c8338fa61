//! Single-threaded driver for the listing.
//!
//! [`Runtime`] feeds events into [`handle_event`], executes the returned
//! actions and turns fetch outcomes back into events. Fetches are queued when
//! issued and performed by [`Runtime::settle`], so several can be outstanding
//! at once; the state machine decides which completion is displayed.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::TimeDelta;

use crate::app::{handle_event, Action, Event, ListState, SearchInput};
use crate::cache::{CacheKey, ResultCache};
use crate::domain::error::{ApiError, Result};
use crate::domain::{BikePage, QueryState};
use crate::http::{ApiClient, Method, BIKES_PATH};
use crate::runtime::analytics;
use crate::ui::ListViewModel;
use crate::Config;

pub struct Runtime {
    state: ListState,
    search: SearchInput,
    client: ApiClient,
    cache: ResultCache<BikePage>,
    current_url: String,
    in_flight: VecDeque<(u64, QueryState)>,
    analytics: bool,
}

impl Runtime {
    /// Creates a runtime with the cache and analytics settings from `config`.
    #[must_use]
    pub fn new(config: &Config, client: ApiClient) -> Self {
        let ttl = i64::try_from(config.cache_ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(TimeDelta::try_seconds);
        Self {
            state: ListState::new(),
            search: SearchInput::new(""),
            client,
            cache: ResultCache::new(config.cache_capacity, ttl),
            current_url: String::new(),
            in_flight: VecDeque::new(),
            analytics: config.enable_analytics,
        }
    }

    /// Handles one event and executes its actions. Returns whether the view changed.
    ///
    /// The search box is re-synced whenever the canonical term changes, and
    /// analytics only see events that changed the listing.
    ///
    /// # Errors
    ///
    /// Propagates state errors from [`handle_event`].
    pub fn dispatch(&mut self, event: Event) -> Result<bool> {
        let previous_term = self.state.query.search_term.clone();
        let (changed, actions) = handle_event(&mut self.state, &event)?;

        if changed && self.analytics {
            analytics::record(&event);
        }

        match event {
            Event::Mount { .. } if changed => {
                self.search = SearchInput::new(&self.state.query.search_term);
            }
            Event::Mount { .. } | Event::FetchCompleted { .. } => {}
            Event::ClearFilters => self.search.sync_external(&self.state.query.search_term),
            _ if self.state.query.search_term != previous_term => {
                self.search.sync_external(&self.state.query.search_term);
            }
            _ => {}
        }

        for action in actions {
            self.execute(action);
        }
        Ok(changed)
    }

    /// Performs every queued fetch in issue order, feeding each result back.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`dispatch`](Self::dispatch).
    pub fn settle(&mut self) -> Result<bool> {
        let mut changed = false;
        while let Some((seq, query)) = self.in_flight.pop_front() {
            let result = self.fetch(&query);
            changed |= self.dispatch(Event::FetchCompleted { seq, result })?;
        }
        Ok(changed)
    }

    /// Records a keystroke in the search box.
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search.on_input(text, now);
    }

    /// Propagates the search term if its quiet period has passed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`dispatch`](Self::dispatch).
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        match self.search.poll(now) {
            Some(term) => self.dispatch(Event::SearchChanged(term)),
            None => Ok(false),
        }
    }

    /// Empties the search box and propagates the empty term at once.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`dispatch`](Self::dispatch).
    pub fn clear_search(&mut self) -> Result<bool> {
        let term = self.search.clear();
        self.dispatch(Event::SearchChanged(term))
    }

    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    #[must_use]
    pub const fn search(&self) -> &SearchInput {
        &self.search
    }

    /// The page URL's query string as last written.
    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached listing.
    pub fn invalidate_cache(&mut self) {
        tracing::debug!(entries = self.cache.len(), "clearing result cache");
        self.cache.clear();
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Computes the view model for the current state.
    #[must_use]
    pub fn view(&self) -> ListViewModel {
        ListViewModel::build(&self.state, self.search.text(), self.client.base_url())
    }

    /// Stops the runtime; a pending search propagation never fires.
    pub fn shutdown(self) {
        tracing::debug!(pending_fetches = self.in_flight.len(), "runtime shutting down");
        self.search.unmount();
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::UpdateUrl(query) => {
                tracing::debug!(url_query = %query, "url updated");
                self.current_url = query;
            }
            Action::Fetch { seq, query } => self.in_flight.push_back((seq, query)),
        }
    }

    fn fetch(&mut self, query: &QueryState) -> std::result::Result<BikePage, ApiError> {
        let _span = tracing::debug_span!("fetch_listing", query = %query).entered();

        let key = CacheKey::new(Method::Get, BIKES_PATH, &query.api_params());
        if let Some(page) = self.cache.get(&key) {
            tracing::debug!(key = %key, "serving listing from cache");
            return Ok(page);
        }

        let page = self.client.fetch_bikes(query)?;
        self.cache.set(key, page.clone());
        Ok(page)
    }
}
