//! Error types for the bike rental client.
//!
//! [`ApiError`] classifies every failed backend call into exactly one kind and
//! carries what is needed to produce a single display message. [`BikeRentalError`]
//! is the crate-wide error that wraps API failures together with storage, I/O,
//! configuration and state machine errors. Both use `thiserror`.

use serde_json::Value;
use thiserror::Error;

/// Message shown for [`ApiError::Network`].
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Message shown for [`ApiError::Auth`].
pub const AUTH_ERROR_MESSAGE: &str = "Authentication failed. Please log in again.";

/// Message shown for [`ApiError::Server`].
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// A failed call against the backend API.
///
/// The kind is decided by the HTTP wrapper: no response at all is `Network`,
/// 401/403 (or a missing token when authentication is required) is `Auth`,
/// 5xx is `Server`, and every other non-success status is `Validation`.
/// A success status with a body of the wrong shape is `Decode`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request was rejected as unauthenticated or unauthorized.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The backend failed with a 5xx status.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other 4xx (or unexpected) status, with the message extracted from the body.
    #[error("request failed (HTTP {status}): {message}")]
    Validation { status: u16, message: String },

    /// The response succeeded but its body could not be interpreted.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-success HTTP response.
    ///
    /// The detail message is taken from the body's `error` field, then
    /// `message`, then `detail`, and finally falls back to
    /// `HTTP {status} - {status_text}`.
    #[must_use]
    pub fn from_status(status: u16, status_text: &str, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| format!("HTTP {status} - {status_text}"));

        match status {
            401 | 403 => Self::Auth(message),
            500.. => Self::Server { status, message },
            _ => Self::Validation { status, message },
        }
    }

    /// Returns the single human-readable message for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Auth(_) => AUTH_ERROR_MESSAGE.to_string(),
            Self::Server { .. } => SERVER_ERROR_MESSAGE.to_string(),
            Self::Validation { message, .. } | Self::Decode(message) => message.clone(),
        }
    }

    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// Pulls a display message out of an error body, in priority order.
fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|field| match value.get(field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
}

/// The main error type for bike rental client operations.
#[derive(Debug, Error)]
pub enum BikeRentalError {
    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading or writing the token store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation arrived in a state that cannot accept it.
    #[error("State error: {0}")]
    State(String),

    /// A filter or query value was not recognised.
    #[error("Invalid value: {0}")]
    Validation(String),
}

/// A specialized `Result` type for bike rental client operations.
pub type Result<T> = std::result::Result<T, BikeRentalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_priority_prefers_error_field() {
        let body = r#"{"detail": "d", "message": "m", "error": "e"}"#;
        let err = ApiError::from_status(400, "Bad Request", body);
        assert_eq!(err.user_message(), "e");

        let body = r#"{"detail": "d", "message": "m"}"#;
        assert_eq!(ApiError::from_status(400, "Bad Request", body).user_message(), "m");

        let body = r#"{"detail": "d"}"#;
        assert_eq!(ApiError::from_status(404, "Not Found", body).user_message(), "d");
    }

    #[test]
    fn message_falls_back_to_status_text() {
        let err = ApiError::from_status(404, "Not Found", "<html>nope</html>");
        assert_eq!(err.user_message(), "HTTP 404 - Not Found");
    }

    #[test]
    fn classifies_status_codes() {
        assert!(ApiError::from_status(401, "Unauthorized", "").is_auth());
        assert!(ApiError::from_status(403, "Forbidden", "").is_auth());
        assert!(ApiError::from_status(502, "Bad Gateway", "").is_server());
        assert!(matches!(
            ApiError::from_status(422, "Unprocessable", "{}"),
            ApiError::Validation { status: 422, .. }
        ));
    }

    #[test]
    fn fixed_messages_for_network_auth_server() {
        assert_eq!(ApiError::Network("refused".into()).user_message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(
            ApiError::from_status(401, "Unauthorized", r#"{"error": "expired"}"#).user_message(),
            AUTH_ERROR_MESSAGE
        );
        assert_eq!(ApiError::from_status(500, "Internal", "").user_message(), SERVER_ERROR_MESSAGE);
    }
}
