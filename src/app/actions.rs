//! Side effects requested by the event handler.
//!
//! The handler never touches the URL or the network itself. It returns
//! [`Action`]s and the runtime executes them in order; a fetch's outcome comes
//! back as an [`Event::FetchCompleted`](crate::app::Event::FetchCompleted).

use crate::domain::QueryState;

/// Commands executed by the runtime after an event is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replaces the page URL's query string (no leading `?`; empty for defaults).
    UpdateUrl(String),

    /// Loads the listing for `query`.
    ///
    /// `seq` identifies the request; only the completion carrying the latest
    /// issued `seq` is applied.
    Fetch {
        seq: u64,
        query: QueryState,
    },
}
