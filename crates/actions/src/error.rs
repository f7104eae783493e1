use std::time::Duration;

use thiserror::Error;

use trigon_store::StoreError;

/// Errors raised by action handlers.
///
/// A handler error halts the surrounding trigger run; the dispatcher maps
/// the variant to a short code and a retryability flag for the execution
/// record.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A referenced entity (project, board) does not exist in tenant scope.
    #[error("not found: {0}")]
    NotFound(String),

    /// The action's configuration cannot be executed as written. Never
    /// retryable.
    #[error("invalid action config: {0}")]
    InvalidConfig(String),

    /// The handler ran but the work itself failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A transport-level failure (DNS, refused connection).
    #[error("connection error: {0}")]
    Connection(String),

    /// The handler's bounded timeout elapsed.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An underlying store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ActionError {
    /// Short error code recorded in execution results.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidConfig(_) => "CONFIGURATION",
            Self::ExecutionFailed(_) => "EXECUTION_FAILED",
            Self::Connection(_) => "CONNECTION",
            Self::Timeout(_) => "TIMEOUT",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Store(_) => "STORE",
        }
    }

    /// Whether a re-run could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Store(_)
        )
    }
}
