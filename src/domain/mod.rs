//! Domain layer for the bike rental client.
//!
//! Types here know nothing about HTTP, storage or the event loop: the bike
//! model and filter vocabularies, the canonical listing query with its URL and
//! API encodings, the fetched page, and the error types.
//!
//! # Organization
//!
//! - [`bike`]: `Bike` and the `BikeType` / `BikeStatus` / `SortOrder` vocabularies
//! - [`query`]: `QueryState`, filter changes, query-string encoding
//! - [`page`]: `BikePage` and the fixed page size
//! - [`error`]: `ApiError`, `BikeRentalError` and the `Result` alias
//!
//! # Examples
//!
//! ```
//! use bike_rental::domain::{BikeStatus, QueryState};
//!
//! let mut state = QueryState::default();
//! state.status_filter = Some(BikeStatus::Available);
//! assert_eq!(state.to_string(), "?status=available");
//! ```

pub mod bike;
pub mod error;
pub mod page;
pub mod query;

pub use bike::{is_valid_image_url, Bike, BikeImage, BikeStatus, BikeType, SortOrder};
pub use error::{ApiError, BikeRentalError, Result};
pub use page::{BikePage, PAGE_SIZE};
pub use query::{Filter, FilterKind, QueryState};
