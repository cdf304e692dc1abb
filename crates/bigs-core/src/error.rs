//! Error types for the bigs client.
//!
//! Callers mostly care about two outcomes: [`Error::AuthExpired`], which means
//! the session has already been cleared and the user must sign in again, and
//! [`Error::Request`], which carries a request-specific failure that never
//! touches the session.

use std::fmt;
use thiserror::Error;

/// The unified error type for bigs operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A request failed for a reason other than authorization.
    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    /// Token refresh failed; the session has been cleared.
    #[error("authentication expired, sign in again")]
    AuthExpired,

    /// Token refresh failed (only surfaced when refreshing directly).
    #[error("token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// Persisted state could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (bad URL, undecodable token, blank content).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the caller should send the user back to sign-in.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Error::AuthExpired)
    }

    /// Returns the HTTP status of a rejected request, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Request(RequestError::Status(err)) => Some(err.status),
            Error::Refresh(RefreshError::RefreshRejected { status, .. }) => *status,
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Request(RequestError::Transport(err))
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Error::Request(RequestError::Status(err))
    }
}

/// Failures of a request that are not authorization failures.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("{0}")]
    Status(#[from] ProtocolError),

    /// The response body did not have the expected shape.
    #[error("invalid response body: {message}")]
    Decode { message: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// A non-success response from the API.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Short error code from the body (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if the server rejected the credentials on the request.
    ///
    /// Only these statuses start a refresh; everything else is passed
    /// through to the caller untouched.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Why a refresh token could not be exchanged for a new pair.
///
/// `Clone` so a single in-flight refresh can hand its outcome to every
/// dispatch waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// No refresh token on record; no request was made.
    #[error("no refresh token on record")]
    NoRefreshToken,

    /// The endpoint answered 2xx without both tokens.
    #[error("refresh response did not contain a complete token pair")]
    MalformedResponse,

    /// The endpoint answered non-2xx, or could not be reached.
    #[error("refresh rejected: {message}")]
    RefreshRejected {
        status: Option<u16>,
        message: String,
    },
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored data could not be parsed.
    #[error("corrupt stored value for '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A token could not be decoded.
    #[error("invalid token: {reason}")]
    Token { reason: String },

    /// A referenced item does not exist.
    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
