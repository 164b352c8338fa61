//! Token records kept in persistent storage.

use serde::{Deserialize, Serialize};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// The pair of tokens that authenticates the user against the backend.
///
/// The access token is replaced wholesale on refresh. Both tokens are
/// cleared together when a refresh fails or a request stays unauthorized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl AuthTokens {
    /// Creates a token pair, typically right after login.
    ///
    /// # Examples
    ///
    /// ```
    /// use bike_rental::storage::AuthTokens;
    ///
    /// let tokens = AuthTokens::new("access", "refresh");
    /// assert!(tokens.is_logged_in());
    /// ```
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }
}
