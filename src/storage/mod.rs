//! Storage layer for persisted auth tokens.
//!
//! Tokens live in a small string key-value store, the desktop counterpart of
//! browser local storage. The store is injected into the HTTP client and the
//! refresh service through the [`TokenStore`] trait.
//!
//! # Modules
//!
//! - `backend`: `TokenStore` trait and the shared handle type
//! - `json`: JSON file store with atomic writes (default)
//! - `memory`: in-process store for tests
//! - `models`: token pair record and storage keys

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::{shared, SharedTokenStore, TokenStore};
pub use json::JsonTokenStore;
pub use memory::MemoryTokenStore;
pub use models::{AuthTokens, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
