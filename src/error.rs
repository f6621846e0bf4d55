//! Error types for the Biblioteca client

use thiserror::Error;

/// Failure kinds for remote bookshelf operations.
///
/// The view layer handles both kinds the same way (log and keep the last
/// displayed state), but the distinction is kept explicit at the API seam.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure or undecodable response body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected the request: HTTP {status}")]
    Rejected { status: reqwest::StatusCode },
}

/// Result type alias for remote bookshelf operations
pub type ClientResult<T> = Result<T, ClientError>;
