//! In-memory token store.

use std::collections::HashMap;

use crate::domain::error::Result;
use crate::storage::backend::TokenStore;
use crate::storage::models::AuthTokens;

/// Token store that lives only as long as the process.
///
/// Used under test and when the CLI runs with `--no-persist`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    values: HashMap<String, String>,
}

impl MemoryTokenStore {
    /// Creates a store pre-filled with `tokens`.
    #[must_use]
    pub fn with_tokens(tokens: &AuthTokens) -> Self {
        let mut values = HashMap::new();
        if let Some(access) = &tokens.access_token {
            values.insert(crate::storage::models::ACCESS_TOKEN_KEY.to_string(), access.clone());
        }
        if let Some(refresh) = &tokens.refresh_token {
            values.insert(crate::storage::models::REFRESH_TOKEN_KEY.to_string(), refresh.clone());
        }
        Self { values }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
