//! Event handling for the bike listing.
//!
//! [`handle_event`] turns one [`Event`] into state changes on [`ListState`] and
//! the [`Action`]s the runtime must execute. It returns `(changed, actions)`,
//! where `changed` tells the caller whether the view needs to be recomputed.
//!
//! Any event that changes the query yields `UpdateUrl` followed by `Fetch`;
//! an event that leaves the query as it was yields nothing.

use crate::app::{Action, ListState};
use crate::domain::error::{ApiError, Result};
use crate::domain::{BikePage, Filter};

/// Inputs to the listing state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// First display; `query` is the page URL's query string.
    Mount { query: String },

    /// The debounced search term settled on a new value.
    SearchChanged(String),

    /// A filter or sort control changed.
    FilterChanged(Filter),

    /// "Clear filters" was pressed.
    ClearFilters,

    /// A pagination control asked for this page.
    PageRequested(u32),

    /// "Try again" after a failed load.
    Retry,

    /// A fetch issued under `seq` finished.
    FetchCompleted {
        seq: u64,
        result: std::result::Result<BikePage, ApiError>,
    },
}

/// Processes `event` against `state`.
///
/// # Errors
///
/// Returns [`BikeRentalError::State`](crate::BikeRentalError::State) for a
/// user operation that arrives before [`Event::Mount`].
pub fn handle_event(state: &mut ListState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    let changed = match event {
        Event::Mount { query } => {
            if !state.mount(query) {
                return Ok((false, vec![]));
            }
            true
        }
        Event::SearchChanged(term) => state.set_search(term)?,
        Event::FilterChanged(filter) => state.set_filter(*filter)?,
        Event::ClearFilters => state.clear_filters()?,
        Event::PageRequested(page) => state.set_page(*page)?,
        Event::Retry => {
            if !state.mounted {
                return Ok((false, vec![]));
            }
            tracing::debug!(query = %state.query, "retrying fetch");
            state.error = None;
            return Ok((true, vec![state.begin_fetch()]));
        }
        Event::FetchCompleted { seq, result } => {
            let applied = state.complete_fetch(*seq, result.clone());
            return Ok((applied, vec![]));
        }
    };

    if !changed {
        return Ok((false, vec![]));
    }
    Ok((true, state.sync_actions()))
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mount { .. } => "mount",
        Event::SearchChanged(_) => "search_changed",
        Event::FilterChanged(_) => "filter_changed",
        Event::ClearFilters => "clear_filters",
        Event::PageRequested(_) => "page_requested",
        Event::Retry => "retry",
        Event::FetchCompleted { .. } => "fetch_completed",
    }
}
