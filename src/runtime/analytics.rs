//! Usage events for the analytics sink.
//!
//! When analytics are enabled, user-facing listing events are emitted as
//! `tracing` events on the `bike_rental::analytics` target so a subscriber
//! layer can route them separately from diagnostics.

use crate::app::Event;
use crate::domain::Filter;

/// Tracing target of analytics events.
pub const ANALYTICS_TARGET: &str = "bike_rental::analytics";

/// Emits an analytics event for `event`, if it is one users cause.
pub fn record(event: &Event) {
    match event {
        Event::Mount { query } => {
            tracing::info!(target: ANALYTICS_TARGET, action = "listing_viewed", query = %query);
        }
        Event::SearchChanged(term) => {
            tracing::info!(target: ANALYTICS_TARGET, action = "search", term_len = term.chars().count());
        }
        Event::FilterChanged(filter) => {
            let (kind, value) = match filter {
                Filter::Type(t) => ("type", t.map(|t| t.as_str())),
                Filter::Status(s) => ("status", s.map(|s| s.as_str())),
                Filter::Sort(s) => ("sort", s.map(|s| s.as_str())),
            };
            tracing::info!(
                target: ANALYTICS_TARGET,
                action = "filter",
                kind = kind,
                value = value.unwrap_or("all")
            );
        }
        Event::ClearFilters => {
            tracing::info!(target: ANALYTICS_TARGET, action = "clear_filters");
        }
        Event::PageRequested(page) => {
            tracing::info!(target: ANALYTICS_TARGET, action = "paginate", page = page);
        }
        Event::Retry => {
            tracing::info!(target: ANALYTICS_TARGET, action = "retry");
        }
        Event::FetchCompleted { .. } => {}
    }
}
