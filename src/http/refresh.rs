//! Access token refresh.

use std::rc::Rc;

use serde_json::{json, Value};

use crate::http::transport::{HttpRequest, Method, Transport};
use crate::storage::SharedTokenStore;

/// Path of the refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "token/refresh/";

/// Exchanges the stored refresh token for a new access token.
///
/// Shares the token store with [`ApiClient`](crate::http::ApiClient). It never
/// navigates anywhere on failure; it only clears the tokens and reports `None`,
/// leaving the caller to decide what a logged-out user sees.
#[derive(Clone)]
pub struct TokenRefresher {
    url: String,
    transport: Rc<dyn Transport>,
    store: SharedTokenStore,
}

impl TokenRefresher {
    /// `base_url` must end with `/`.
    pub fn new(base_url: &str, transport: Rc<dyn Transport>, store: SharedTokenStore) -> Self {
        Self {
            url: format!("{base_url}{REFRESH_PATH}"),
            transport,
            store,
        }
    }

    /// Requests a new access token.
    ///
    /// Returns `None` without touching the network when no refresh token is
    /// stored. Any failure of the exchange (no response, non-2xx status, a body
    /// without a string `access`) clears both tokens and returns `None`. On
    /// success the new access token is stored and returned.
    pub fn refresh(&self) -> Option<String> {
        let _span = tracing::debug_span!("token_refresh").entered();

        let refresh = match self.store.borrow().refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("no refresh token stored");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read refresh token");
                return None;
            }
        };

        let request = HttpRequest {
            method: Method::Post,
            url: self.url.clone(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(json!({ "refresh": refresh })),
        };

        tracing::debug!("attempting token refresh");
        match self.exchange(&request) {
            Ok(access) => {
                if let Err(e) = self.store.borrow_mut().set_access_token(&access) {
                    tracing::warn!(error = %e, "failed to persist refreshed access token");
                }
                tracing::info!("token refresh succeeded");
                Some(access)
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "token refresh failed, clearing tokens");
                if let Err(e) = self.store.borrow_mut().clear_tokens() {
                    tracing::warn!(error = %e, "failed to clear tokens");
                }
                None
            }
        }
    }

    fn exchange(&self, request: &HttpRequest) -> Result<String, String> {
        let response = self.transport.send(request).map_err(|e| e.to_string())?;
        if !response.is_success() {
            return Err(format!("HTTP {} - {}", response.status, response.body));
        }
        let body: Value = serde_json::from_str(&response.body).map_err(|e| e.to_string())?;
        body.get("access")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| "response has no access token".to_string())
    }
}
