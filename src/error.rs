//! Error types for the Riksbank API client.
//!
//! [`Error`] is the internal failure taxonomy used below the client
//! boundary. Public operations never return it directly: it is converted
//! into a serializable [`ErrorInfo`](crate::models::ErrorInfo) before it
//! reaches the caller.

use serde_json::Value;
use thiserror::Error;

use crate::models::ErrorKind;

/// A specialized `Result` type for internal client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Riksbank/Kolada client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No client id or client secret is configured.
    #[error(
        "Missing Riksbank API credentials. Please set RIKSBANK_CLIENT_ID and \
         RIKSBANK_CLIENT_SECRET environment variables."
    )]
    AuthConfig,

    /// The token endpoint answered with a payload we cannot use.
    #[error("Invalid token response: {0}")]
    TokenResponse(String),

    /// Connection, DNS, timeout or body transfer failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: status={status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Parsed JSON error body, or the raw text as a JSON string
        body: Value,
    },

    /// Unknown API family or unusable base URL.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` for transport failures that may succeed on retry.
    ///
    /// Status codes are not considered here; whether a status is retried
    /// depends on the per-call [`RetryConfig`](crate::RetryConfig).
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => {
                err.is_connect() || err.is_timeout() || err.is_request() || err.is_body()
            }
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::AuthConfig | Error::TokenResponse(_) => true,
            Error::HttpStatus { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::HttpStatus { status, .. } => (400..500).contains(status),
            Error::InvalidInput(_) | Error::Config(_) | Error::AuthConfig => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Coarse classification used at the client boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AuthConfig => ErrorKind::AuthConfig,
            Error::TokenResponse(_) => ErrorKind::TokenResponse,
            Error::Network(_) => ErrorKind::Network,
            Error::HttpStatus { .. } => ErrorKind::HttpStatus,
            Error::Config(_) | Error::UrlParse(_) => ErrorKind::Config,
            Error::Json(_) => ErrorKind::Decode,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Classify a failure from sending a request.
    ///
    /// Builder failures (bad header names or values) never reached the
    /// network and are reported as invalid input.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Error::InvalidInput(format!("Invalid request: {}", err))
        } else {
            Error::Network(err)
        }
    }

    /// Build an HTTP status error from a raw response body.
    ///
    /// JSON bodies are kept structured; anything else is kept as text.
    pub(crate) fn from_status_body(status: u16, text: &str) -> Self {
        let body = serde_json::from_str::<Value>(text)
            .unwrap_or_else(|_| Value::String(text.to_string()));
        Error::HttpStatus { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        assert!(!Error::AuthConfig.is_retryable());
        assert!(!Error::Config("bad".into()).is_retryable());
        assert!(!Error::HttpStatus {
            status: 503,
            body: Value::Null
        }
        .is_retryable());
    }

    #[test]
    fn test_error_auth() {
        assert!(Error::AuthConfig.is_auth_error());
        assert!(Error::TokenResponse("no token".into()).is_auth_error());
        assert!(Error::HttpStatus {
            status: 401,
            body: Value::Null
        }
        .is_auth_error());
        assert!(!Error::InvalidInput("x".into()).is_auth_error());
    }

    #[test]
    fn test_from_status_body() {
        let err = Error::from_status_body(400, r#"{"message": "bad date"}"#);
        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body["message"], "bad date");
            }
            _ => panic!("Expected HttpStatus error"),
        }

        let err = Error::from_status_body(502, "Bad Gateway");
        match err {
            Error::HttpStatus { body, .. } => {
                assert_eq!(body, Value::String("Bad Gateway".into()));
            }
            _ => panic!("Expected HttpStatus error"),
        }
    }

    #[test]
    fn test_kind_and_status() {
        let err = Error::HttpStatus {
            status: 404,
            body: Value::Null,
        };
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(Error::Config("x".into()).kind(), ErrorKind::Config);
    }

    #[test]
    fn test_builder_failure_is_invalid_input() {
        let err = reqwest::Client::new()
            .get("http://localhost/")
            .header("bad header", "x")
            .build()
            .unwrap_err();
        assert!(err.is_builder());

        let err = Error::from_send(err);
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!err.is_retryable());
    }
}
