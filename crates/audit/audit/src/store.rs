use async_trait::async_trait;

use trigon_core::{ExecutionId, TriggerId};

use crate::error::ExecutionLogError;
use crate::record::{ExecutionPage, ExecutionQuery, ExecutionRecord};

/// Trait for execution log storage backends.
///
/// The log is append-only: there is no update operation, and `record` must
/// never overwrite an existing entry.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Append an execution record.
    async fn record(&self, entry: ExecutionRecord) -> Result<(), ExecutionLogError>;

    /// Retrieve a record by its unique ID.
    async fn get(&self, id: &ExecutionId) -> Result<Option<ExecutionRecord>, ExecutionLogError>;

    /// The most recent record for a trigger, by `executed_at`.
    ///
    /// This derived read is what powers schedule due-checking; the trigger
    /// itself carries no "last run" field that could drift from the log.
    async fn latest_for_trigger(
        &self,
        trigger: &TriggerId,
    ) -> Result<Option<ExecutionRecord>, ExecutionLogError>;

    /// Query records with filters and pagination.
    async fn query(&self, query: &ExecutionQuery) -> Result<ExecutionPage, ExecutionLogError>;
}
