use thiserror::Error;

/// Errors from trigger store, workspace store, and lock operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("lock contention: {0}")]
    LockContention(String),

    #[error("lock expired: {0}")]
    LockExpired(String),

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}
