use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the RPC dispatch layer.
///
/// The taxonomy separates transport-level failures (the HTTP round trip never
/// produced a well-formed payload) from protocol-level failures (the server
/// answered with an error member inside a well-formed payload). Batch
/// demultiplexing adds the internal-consistency case of a missing child
/// result. All variants are serializable for structured error reporting.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RpcError {
    /// A network-level error occurred (connection refused, timeout, body read
    /// failure) before any status line could be interpreted.
    #[error("Network error: {detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP error {status}: {detail}")]
    Http {
        /// HTTP status code of the reply.
        status: u16,
        /// Response body excerpt, if any.
        detail: String,
    },

    /// The session credential is no longer accepted (HTTP 401).
    ///
    /// Carries a fixed human-readable message; never auto-retried.
    #[error("{message}")]
    SessionExpired {
        /// Human-readable recovery instructions.
        message: String,
    },

    /// A well-formed payload carried a server-side error member.
    #[error("Server error {code}: {message}")]
    Server {
        /// Numeric error code reported by the server.
        code: i64,
        /// Error message reported by the server.
        message: String,
    },

    /// A batch response did not contain a result for a submitted command.
    #[error("Internal error: {message}")]
    Internal {
        /// HTTP status of the aggregate reply.
        status: u16,
        /// Description of the inconsistency.
        message: String,
    },

    /// The response body could not be parsed as a JSON payload.
    #[error("Response parse error: {detail}")]
    Parse {
        /// Details about the parse failure.
        detail: String,
    },
}

impl RpcError {
    /// Short display name of the error, used as a dialog title and when
    /// recording batch partial failures.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Network { .. } => "Network Error".to_string(),
            Self::Http { status, .. } => format!("HTTP Error {status}"),
            Self::SessionExpired { .. } => "Session Expired".to_string(),
            Self::Server { code, .. } => format!("Server Error {code}"),
            Self::Internal { status, .. } => format!("Internal Error {status}"),
            Self::Parse { .. } => "Response Parse Error".to_string(),
        }
    }

    /// Whether the failure is expected behavior (user input, stale session,
    /// server-side refusal), used for log classification.
    ///
    /// Returns `true` for `warn`-level failures, `false` for `error`-level.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::SessionExpired { .. })
    }
}

/// Convenience type alias for `Result<T, RpcError>`.
pub type RpcResult<T> = std::result::Result<T, RpcError>;
