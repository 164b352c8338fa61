//! Listing state: the canonical query plus what is currently displayed.
//!
//! [`ListState`] is the single source of truth for the bike listing. Every
//! mutation goes through one of its operations, which keep the invariants:
//! `page >= 1`, any change other than a page change resets `page` to 1, and a
//! fetch result is applied only if it answers the most recently issued fetch.

use crate::app::Action;
use crate::domain::error::{ApiError, BikeRentalError, Result};
use crate::domain::{BikePage, Filter, QueryState};

#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Canonical search, filters, sort and page.
    pub query: QueryState,

    /// Set once by the first mount.
    pub mounted: bool,

    /// Sequence number of the most recently issued fetch (0 before any).
    pub latest_seq: u64,

    /// Last successfully fetched page. Kept while a newer fetch is pending or failed.
    pub page_data: BikePage,

    /// Whether the latest fetch has not completed yet.
    pub loading: bool,

    /// Failure of the latest completed fetch, cleared on the next success.
    pub error: Option<ApiError>,
}

impl ListState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialises the query from the URL. Returns `false` if already mounted.
    pub fn mount(&mut self, url_query: &str) -> bool {
        if self.mounted {
            tracing::debug!("already mounted, ignoring mount");
            return false;
        }
        self.query = QueryState::from_url_query(url_query);
        self.mounted = true;
        tracing::debug!(query = %self.query, "listing mounted");
        true
    }

    /// Sets the search term and goes back to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`BikeRentalError::State`] before mount.
    pub fn set_search(&mut self, term: &str) -> Result<bool> {
        self.ensure_mounted()?;
        let next = QueryState {
            search_term: term.to_string(),
            page: 1,
            ..self.query.clone()
        };
        Ok(self.replace_query(next))
    }

    /// Applies a filter change and goes back to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`BikeRentalError::State`] before mount.
    pub fn set_filter(&mut self, filter: Filter) -> Result<bool> {
        self.ensure_mounted()?;
        let mut next = self.query.clone();
        next.apply_filter(filter);
        next.page = 1;
        Ok(self.replace_query(next))
    }

    /// Resets search, filters and sort, and goes back to page 1.
    ///
    /// # Errors
    ///
    /// Returns [`BikeRentalError::State`] before mount.
    pub fn clear_filters(&mut self) -> Result<bool> {
        self.ensure_mounted()?;
        Ok(self.replace_query(QueryState::default()))
    }

    /// Moves to page `page` if it lies within `1..=max(total_pages, 1)`.
    ///
    /// An out-of-range page is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BikeRentalError::State`] before mount.
    pub fn set_page(&mut self, page: u32) -> Result<bool> {
        self.ensure_mounted()?;
        let last = self.total_pages().max(1);
        if page == 0 || page > last {
            tracing::debug!(page, last, "page out of range, ignoring");
            return Ok(false);
        }
        let next = QueryState {
            page,
            ..self.query.clone()
        };
        Ok(self.replace_query(next))
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.page_data.total_pages()
    }

    /// Issues a fetch for the current query under a fresh sequence number.
    pub fn begin_fetch(&mut self) -> Action {
        self.latest_seq += 1;
        self.loading = true;
        tracing::debug!(seq = self.latest_seq, query = %self.query, "fetch issued");
        Action::Fetch {
            seq: self.latest_seq,
            query: self.query.clone(),
        }
    }

    /// The actions that follow any query change: URL sync, then a fetch.
    pub fn sync_actions(&mut self) -> Vec<Action> {
        vec![Action::UpdateUrl(self.query.to_url_query()), self.begin_fetch()]
    }

    /// Applies a fetch completion. Returns `false` if it was stale.
    ///
    /// A failure keeps the previously displayed page and records the error.
    pub fn complete_fetch(&mut self, seq: u64, result: std::result::Result<BikePage, ApiError>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale fetch result");
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!(seq, items = page.items.len(), total = page.total_count, "fetch applied");
                self.page_data = page;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "fetch failed");
                self.error = Some(e);
            }
        }
        true
    }

    /// Message to show for the current error, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ApiError::user_message)
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(BikeRentalError::State("listing is not mounted".to_string()))
        }
    }

    fn replace_query(&mut self, next: QueryState) -> bool {
        if next == self.query {
            return false;
        }
        tracing::trace!(from = %self.query, to = %next, "query changed");
        self.query = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BikeStatus, BikeType, SortOrder};

    fn mounted(url: &str) -> ListState {
        let mut state = ListState::new();
        assert!(state.mount(url));
        state
    }

    fn page_of(total: u64) -> BikePage {
        BikePage {
            items: vec![],
            total_count: total,
        }
    }

    #[test]
    fn operations_before_mount_are_rejected() {
        let mut state = ListState::new();
        assert!(matches!(state.set_search("x"), Err(BikeRentalError::State(_))));
        assert!(matches!(state.set_page(1), Err(BikeRentalError::State(_))));
    }

    #[test]
    fn mount_happens_once() {
        let mut state = mounted("type=Road");
        assert!(!state.mount("type=BMX"));
        assert_eq!(state.query.type_filter, Some(BikeType::Road));
    }

    #[test]
    fn filter_changes_reset_page() {
        let mut state = mounted("page=3");
        state.page_data = page_of(100);

        assert!(state.set_filter(Filter::Status(Some(BikeStatus::Booked))).unwrap());
        assert_eq!(state.query.page, 1);

        state.set_page(4).unwrap();
        assert!(state.set_filter(Filter::Sort(Some(SortOrder::NameDesc))).unwrap());
        assert_eq!(state.query.page, 1);

        state.set_page(2).unwrap();
        assert!(state.set_search("trek").unwrap());
        assert_eq!(state.query.page, 1);
    }

    #[test]
    fn unchanged_operations_report_no_change() {
        let mut state = mounted("type=Road");
        assert!(!state.set_filter(Filter::Type(Some(BikeType::Road))).unwrap());
        assert!(!state.set_search("").unwrap());
        assert!(!state.set_page(1).unwrap());
    }

    #[test]
    fn page_bounds_follow_total_pages() {
        let mut state = mounted("");
        assert!(!state.set_page(2).unwrap());

        state.page_data = page_of(25);
        assert_eq!(state.total_pages(), 3);
        assert!(!state.set_page(0).unwrap());
        assert!(!state.set_page(4).unwrap());
        assert!(state.set_page(3).unwrap());
        assert_eq!(state.query.page, 3);
    }

    #[test]
    fn clear_filters_restores_defaults() {
        let mut state = mounted("search=a&type=BMX&status=booked&sort=name&page=2");
        assert!(state.clear_filters().unwrap());
        assert_eq!(state.query, QueryState::default());
        assert!(!state.clear_filters().unwrap());
    }

    #[test]
    fn only_latest_completion_applies() {
        let mut state = mounted("");
        let Action::Fetch { seq: first, .. } = state.begin_fetch() else {
            panic!("expected fetch");
        };
        let Action::Fetch { seq: second, .. } = state.begin_fetch() else {
            panic!("expected fetch");
        };

        assert!(state.complete_fetch(second, Ok(page_of(2))));
        assert!(!state.complete_fetch(first, Ok(page_of(50))));
        assert_eq!(state.page_data.total_count, 2);
        assert!(!state.loading);
    }

    #[test]
    fn failure_keeps_displayed_items() {
        let mut state = mounted("");
        let Action::Fetch { seq, .. } = state.begin_fetch() else {
            panic!("expected fetch");
        };
        state.complete_fetch(seq, Ok(page_of(5)));

        let Action::Fetch { seq, .. } = state.begin_fetch() else {
            panic!("expected fetch");
        };
        state.complete_fetch(seq, Err(ApiError::Network("down".into())));

        assert_eq!(state.page_data.total_count, 5);
        assert_eq!(
            state.error_message().as_deref(),
            Some("Network error. Please check your connection.")
        );
    }
}
