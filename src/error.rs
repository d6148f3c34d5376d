//! Error types for Sesame

use thiserror::Error;

/// Result type alias for Sesame operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error category surfaced to callers of the token endpoints.
///
/// The exact cause stays in [`Error`]; this is the bucket it falls into,
/// which is usually all a login screen needs to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    /// The server answered with a 5xx status
    Server,
    /// The server rejected the request with a 4xx status
    Auth,
    /// The server could not be reached, or returned nothing usable
    Connection,
    /// Anything else
    Unknown,
}

/// Errors that can occur in Sesame
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Token endpoint error ({status:?}): {message}")]
    Token { status: ErrorStatus, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Classify this error into an [`ErrorStatus`].
    ///
    /// HTTP transport failures (unreachable host, refused connection,
    /// timeout) count as `Connection`; everything without a clearer
    /// category is `Unknown`.
    pub fn status(&self) -> ErrorStatus {
        match self {
            Error::Token { status, .. } => *status,
            Error::Http(e) if e.is_connect() || e.is_timeout() => ErrorStatus::Connection,
            _ => ErrorStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_keeps_status() {
        let err = Error::Token {
            status: ErrorStatus::Server,
            message: "internal error".to_string(),
        };
        assert_eq!(err.status(), ErrorStatus::Server);
    }

    #[test]
    fn test_other_errors_are_unknown() {
        let err = Error::OAuth("bad redirect".to_string());
        assert_eq!(err.status(), ErrorStatus::Unknown);

        let err = Error::Config("missing client id".to_string());
        assert_eq!(err.status(), ErrorStatus::Unknown);
    }
}
