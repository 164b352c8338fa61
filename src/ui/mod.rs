//! Presentation layer: view models computed from the listing state, and a
//! plain-text renderer for the command line.
//!
//! ```text
//! ListState → ListViewModel::build → ListViewModel → render → stdout
//! ```

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_to_string};
pub use viewmodel::{
    page_window, BikeCard, FilterControl, FilterOption, ListBody, ListViewModel, PageItem,
    PaginationView,
};
