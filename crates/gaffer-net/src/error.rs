//! Error types for the Gaffer client.

/// Errors raised by the Gaffer client.
#[derive(Debug, thiserror::Error)]
pub enum GafferError {
    /// The service answered with a status other than 200.
    #[error("Status {status}: {body}")]
    Service {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// Connection, TLS handshake, timeout or protocol failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Certificate or key material could not be read or parsed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Client configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A body or streamed line was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A response body was not valid text.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// An operation could not be built from untyped input.
    #[error(transparent)]
    Operation(#[from] gaffer_core::Error),
}

impl GafferError {
    /// Get the HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get the response body of a service error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Service { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check whether this is a service error.
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}

/// A specialized Result type for Gaffer client operations.
pub type Result<T> = std::result::Result<T, GafferError>;
