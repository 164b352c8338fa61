//! Authenticated API client.
//!
//! Wraps every backend call: resolves the URL against the configured base,
//! attaches the bearer token, refreshes once on a 401 and normalises failures
//! into [`ApiError`].

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::error::ApiError;
use crate::domain::page::BikePage;
use crate::domain::query::{encode_pairs, QueryState};
use crate::http::refresh::TokenRefresher;
use crate::http::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::storage::SharedTokenStore;

/// Endpoint of the bike listing, relative to the API base URL.
pub const BIKES_PATH: &str = "bikes/";

/// Whether a request may go out without an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPolicy {
    /// A missing token fails locally with [`ApiError::Auth`].
    #[default]
    Required,
    /// A missing token just omits the `Authorization` header.
    Optional,
}

/// A successful response with its decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not have `T`'s shape.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// HTTP client for the bike rental backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn Transport>,
    store: SharedTokenStore,
    refresher: TokenRefresher,
}

impl ApiClient {
    /// Creates a client for `base_url` (a trailing `/` is added if missing).
    ///
    /// The token refresher is built on the same transport and store.
    pub fn new(base_url: &str, transport: Rc<dyn Transport>, store: SharedTokenStore) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let refresher = TokenRefresher::new(&base_url, Rc::clone(&transport), Rc::clone(&store));
        Self {
            base_url,
            transport,
            store,
            refresher,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    /// Sends a request that requires a logged-in user.
    ///
    /// # Errors
    ///
    /// See [`request_with`](Self::request_with).
    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        self.request_with(AuthPolicy::Required, method, path, body)
    }

    /// Sends a request to `path` (relative to the base URL, may carry a query).
    ///
    /// On a 401 the refresh service is asked once for a new token and the
    /// request is retried once with it. If the refresh fails or the retry is
    /// also unauthorized, both tokens are cleared.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Auth`] for a missing token under [`AuthPolicy::Required`],
    ///   a 403, or a 401 that survives the refresh
    /// - [`ApiError::Network`] when no response was received
    /// - [`ApiError::Server`] / [`ApiError::Validation`] for other non-2xx statuses
    /// - [`ApiError::Decode`] when a 2xx body is not JSON
    pub fn request_with(
        &self,
        policy: AuthPolicy,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let _span = tracing::debug_span!("api_request", method = %method, path = %path).entered();

        let token = self.stored_access_token();
        if token.is_none() && policy == AuthPolicy::Required {
            tracing::debug!("no access token, request not sent");
            return Err(ApiError::Auth("Unauthorized: No token".to_string()));
        }

        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        let response = self.send(method, &url, token.as_deref(), body.as_ref())?;
        if response.status != 401 {
            return finish(response);
        }

        tracing::debug!("unauthorized, attempting token refresh");
        let Some(fresh) = self.refresher.refresh() else {
            self.clear_tokens();
            return finish(response);
        };

        let retried = self.send(method, &url, Some(&fresh), body.as_ref())?;
        if retried.status == 401 {
            tracing::warn!("still unauthorized after token refresh");
            self.clear_tokens();
        }
        finish(retried)
    }

    /// Fetches one page of the bike listing for `query`.
    ///
    /// The listing is public, so the token is optional.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request, or [`ApiError::Decode`] if the body
    /// is not a listing.
    pub fn fetch_bikes(&self, query: &QueryState) -> Result<BikePage, ApiError> {
        let path = format!("{BIKES_PATH}?{}", encode_pairs(query.api_params()));
        let response = self.request_with(AuthPolicy::Optional, Method::Get, &path, None)?;
        let page = BikePage::from_json(response.body)?;
        tracing::debug!(
            items = page.items.len(),
            total_count = page.total_count,
            "bike page fetched"
        );
        Ok(page)
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<HttpResponse, ApiError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body.cloned(),
        };
        self.transport
            .send(&request)
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    fn stored_access_token(&self) -> Option<String> {
        self.store.borrow().access_token().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read access token");
            None
        })
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.store.borrow_mut().clear_tokens() {
            tracing::warn!(error = %e, "failed to clear tokens");
        }
    }
}

fn finish(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    if !response.is_success() {
        let err = ApiError::from_status(response.status, &response.status_text, &response.body);
        tracing::debug!(status = response.status, error = %err, "request failed");
        return Err(err);
    }

    let body = if response.body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?
    };
    Ok(ApiResponse {
        status: response.status,
        body,
    })
}
