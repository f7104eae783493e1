/// Errors that can occur during execution log operations.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionLogError {
    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Storage(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
