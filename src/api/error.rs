//! Error taxonomy for the load balancer client
//!
//! Every operation returns [`Error`] unchanged to its caller. Remote failures
//! keep the server's status code and message so callers can branch on
//! [`RemoteKind`] without parsing strings.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a [`Transport`](super::transport::Transport) implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the client
#[derive(Debug, Error)]
pub enum Error {
    /// Path, query string, or body could not be constructed.
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// Connection-level failure reported by the transport.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The transport gave up waiting for a response.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("API request failed: {status} - {message}")]
    Remote { status: StatusCode, message: String },

    /// A successful response body did not match the expected envelope.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Classification of a [`Error::Remote`] derived from its status code alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    NotFound,
    Unauthorized,
    Validation,
    Server,
    Other,
}

impl RemoteKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => RemoteKind::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteKind::Unauthorized,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                RemoteKind::Validation
            },
            s if s.is_server_error() => RemoteKind::Server,
            _ => RemoteKind::Other,
        }
    }
}

impl Error {
    /// Wrap any transport-level error
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Transport(err.into())
    }

    /// Status code of a remote failure
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classification of a remote failure, `None` for local errors
    pub fn remote_kind(&self) -> Option<RemoteKind> {
        self.status().map(RemoteKind::from_status)
    }

    pub fn is_not_found(&self) -> bool {
        self.remote_kind() == Some(RemoteKind::NotFound)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
