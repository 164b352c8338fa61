//! Runtime driving the listing: action execution, fetches and the debounce clock.
//!
//! - `executor`: [`Runtime`]
//! - `analytics`: usage events emitted when analytics are enabled

pub mod analytics;
pub mod executor;

pub use analytics::ANALYTICS_TARGET;
pub use executor::Runtime;
