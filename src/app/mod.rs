//! Listing state machine: state, events, actions and the debounced search box.
//!
//! ```text
//! user input ─▶ Event ─▶ handle_event ─▶ ListState ─▶ Vec<Action>
//!                  ▲                                      │
//!                  └──────── FetchCompleted ◀── runtime ◀─┘
//! ```
//!
//! - [`actions`]: side effects for the runtime
//! - [`debounce`]: [`SearchInput`] and its cancellable timer
//! - [`handler`]: [`handle_event`]
//! - [`state`]: [`ListState`] and its operations

pub mod actions;
pub mod debounce;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use debounce::{DebounceTimer, SearchInput, SEARCH_DEBOUNCE};
pub use handler::{handle_event, Event};
pub use state::ListState;
