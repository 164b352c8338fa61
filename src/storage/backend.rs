//! Token store abstraction.
//!
//! The HTTP client and the refresh service never touch a concrete store; they
//! receive a [`SharedTokenStore`] so a test can hand them an in-memory store
//! and inspect it afterwards.
//!
//! The trait is a plain string key-value store. Token-specific helpers are
//! provided methods on top of `get`/`set`/`remove`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::error::Result;
use crate::storage::models::{AuthTokens, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Persistent string key-value storage for auth tokens.
///
/// # Implementations
///
/// - [`JsonTokenStore`](crate::storage::JsonTokenStore): JSON file with atomic writes
/// - [`MemoryTokenStore`](crate::storage::MemoryTokenStore): process memory only
///
/// # Examples
///
/// ```
/// use bike_rental::storage::{MemoryTokenStore, TokenStore};
///
/// let mut store = MemoryTokenStore::default();
/// store.set_access_token("abc")?;
/// assert_eq!(store.access_token()?.as_deref(), Some("abc"));
/// store.clear_tokens()?;
/// assert!(store.access_token()?.is_none());
/// # Ok::<(), bike_rental::BikeRentalError>(())
/// ```
pub trait TokenStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn access_token(&self) -> Result<Option<String>> {
        self.get(ACCESS_TOKEN_KEY)
    }

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn refresh_token(&self) -> Result<Option<String>> {
        self.get(REFRESH_TOKEN_KEY)
    }

    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set_access_token(&mut self, token: &str) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, token)
    }

    /// Reads both tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn tokens(&self) -> Result<AuthTokens> {
        Ok(AuthTokens {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
        })
    }

    /// Writes both tokens; a `None` removes that key.
    ///
    /// # Errors
    ///
    /// Returns an error if a write cannot be persisted.
    fn store_tokens(&mut self, tokens: &AuthTokens) -> Result<()> {
        for (key, value) in [
            (ACCESS_TOKEN_KEY, &tokens.access_token),
            (REFRESH_TOKEN_KEY, &tokens.refresh_token),
        ] {
            match value {
                Some(v) => self.set(key, v)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }

    /// Removes both tokens, logging the user out.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn clear_tokens(&mut self) -> Result<()> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}

/// A token store shared by the HTTP client and the refresh service.
pub type SharedTokenStore = Rc<RefCell<dyn TokenStore>>;

/// Wraps a concrete store for sharing.
pub fn shared<S: TokenStore + 'static>(store: S) -> SharedTokenStore {
    Rc::new(RefCell::new(store))
}
