//! Error types for RPC operations.
//!
//! This module defines the [`RpcError`] enum which encompasses all possible
//! failure modes when calling NarrativeService methods.

use thiserror::Error;

/// Errors that can occur during an RPC call.
///
/// Every call either fully succeeds with a decoded result or fails with one
/// of these variants; there is no partial-success state and no internal
/// recovery or retry.
///
/// # Error Categories
///
/// - **Authorization**: [`Unauthorized`](RpcError::Unauthorized)
/// - **Connectivity**: [`RequestFailed`](RpcError::RequestFailed),
///   [`Timeout`](RpcError::Timeout)
/// - **Protocol**: [`Protocol`](RpcError::Protocol)
/// - **Remote failures**: [`Server`](RpcError::Server)
#[derive(Debug, Error)]
pub enum RpcError {
    /// The credential was rejected, or credentials would have been sent over
    /// an insecure connection without that being explicitly allowed.
    ///
    /// Covers HTTP 401 responses, failed username/password exchanges, and
    /// the client-side guard against sending a token over plain `http`.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request did not complete within the configured read timeout.
    ///
    /// Kept separate from [`RequestFailed`](RpcError::RequestFailed) so
    /// callers can distinguish a slow server from an unreachable one.
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The HTTP request failed due to a network or connection error.
    ///
    /// Connection refused, DNS resolution failure, TLS handshake errors and
    /// similar transport-level problems end up here.
    #[error("request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// The response violated the JSON-RPC contract.
    ///
    /// A malformed envelope, a non-array result, a missing or empty result
    /// sequence for a method that requires one, or an element that does not
    /// match the expected shape.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The remote method reported an application-level failure.
    ///
    /// The code, message and structured detail from the error envelope are
    /// preserved verbatim; downstream tooling inspects them.
    #[error("server error {code}: {message}")]
    Server {
        /// Error code from the envelope, or the HTTP status code when the
        /// server failed without producing an envelope.
        code: i64,
        /// Human-readable message from the envelope.
        message: String,
        /// Nested platform-specific error detail, if the server sent any.
        data: Option<serde_json::Value>,
    },

    /// A local file operation failed.
    ///
    /// Only produced by the streaming-upload staging file and the one-shot
    /// response-capture file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout(err)
        } else {
            RpcError::RequestFailed(err)
        }
    }
}
