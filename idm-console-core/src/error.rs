//! Unified error type definition

use thiserror::Error;

// Re-export dispatch-layer error type
pub use idm_console_rpc::RpcError;

/// Core layer error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A response arrived without the member the lifecycle needs
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Bootstrap payload could not be decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Dispatch-layer error (converted from the rpc crate)
    #[error("{0}")]
    Rpc(#[from] RpcError),
}

impl CoreError {
    /// Whether the failure is expected behavior, used for log classification.
    ///
    /// Level `warn` should be used when returning `true`, level `error`
    /// otherwise. **Please update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Rpc(e) => e.is_expected(),
            Self::MalformedResponse(_) | Self::SerializationError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
