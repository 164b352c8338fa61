//! JSON file-based token store.
//!
//! Keeps the key-value map in memory and writes the whole map on every change
//! using an atomic write (write-to-temp + rename), so a crash never leaves a
//! half-written token file behind. Tokens therefore survive restarts the way
//! browser local storage survives reloads.

use crate::domain::error::{BikeRentalError, Result};
use crate::storage::backend::TokenStore;
use crate::storage::models::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk layout of the token file.
///
/// ```json
/// {
///   "version": 1,
///   "values": {
///     "accessToken": "eyJ...",
///     "refreshToken": "eyJ..."
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    version: u32,

    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            values: BTreeMap::new(),
        }
    }
}

/// Token store persisted to a JSON file.
#[derive(Debug)]
pub struct JsonTokenStore {
    file_path: PathBuf,
    data: StoreData,
}

impl JsonTokenStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not valid JSON
    /// - The file cannot be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bike_rental::storage::{JsonTokenStore, TokenStore};
    /// use std::path::PathBuf;
    ///
    /// let store = JsonTokenStore::open(PathBuf::from("/tmp/bike-rental/tokens.json"))?;
    /// let _token = store.access_token()?;
    /// # Ok::<(), bike_rental::BikeRentalError>(())
    /// ```
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening JSON token store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no token file yet, starting empty");
            StoreData::default()
        };

        tracing::debug!(key_count = data.values.len(), "token store opened");

        Ok(Self { file_path, data })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| BikeRentalError::Storage(format!("failed to parse token file: {e}")))
    }

    /// Writes `data` with an atomic rename, then adopts it as the current map.
    ///
    /// On failure the in-memory map is left as it was, matching the file.
    fn commit(&mut self, data: StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| BikeRentalError::Storage(format!("failed to serialize tokens: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing token file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.data = data;
        tracing::debug!(key_count = self.data.values.len(), "token store saved");
        Ok(())
    }
}

impl TokenStore for JsonTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("token_store_set", key = %key).entered();
        if self.data.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        let mut next = self.data.clone();
        next.values.insert(key.to_string(), value.to_string());
        self.commit(next)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("token_store_remove", key = %key).entered();
        if !self.data.values.contains_key(key) {
            return Ok(());
        }
        let mut next = self.data.clone();
        next.values.remove(key);
        self.commit(next)
    }

    /// Clears both tokens with a single write.
    fn clear_tokens(&mut self) -> Result<()> {
        let mut next = self.data.clone();
        let removed_access = next.values.remove(ACCESS_TOKEN_KEY).is_some();
        let removed_refresh = next.values.remove(REFRESH_TOKEN_KEY).is_some();
        if !(removed_access || removed_refresh) {
            return Ok(());
        }
        tracing::debug!("clearing stored tokens");
        self.commit(next)
    }
}
