//! Fetch error type so callers can tell a missing resource from a failure.

use thiserror::Error;

/// Error returned by a single GET.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered 404; for the id sweep this is the end-of-range signal.
    #[error("not found")]
    NotFound,
    /// Any other non-2xx status.
    #[error("unexpected status code: {0}")]
    Status(u32),
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("transport: {0}")]
    Curl(#[from] curl::Error),
    /// The blocking task running the request panicked or was cancelled.
    #[error("fetch task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Map a final HTTP status to success or a `FetchError`.
pub(crate) fn check_status(code: u32) -> Result<(), FetchError> {
    match code {
        200..=299 => Ok(()),
        404 => Err(FetchError::NotFound),
        other => Err(FetchError::Status(other)),
    }
}
