use thiserror::Error;

use trigon_audit::ExecutionLogError;
use trigon_core::{TenantId, TriggerId, ValidationError};
use trigon_store::StoreError;

/// Errors surfaced to callers of the ingress.
///
/// Only infrastructural problems appear here. An individual trigger's
/// action failure is recorded in its execution record and reported in the
/// per-trigger summary, never raised.
#[derive(Debug, Error)]
pub enum IngressError {
    /// The tenant does not resolve. Nothing was looked up or persisted.
    #[error("tenant not found: {0}")]
    TenantNotFound(TenantId),

    /// The trigger does not exist in tenant scope (manual path).
    #[error("trigger not found: {0}")]
    TriggerNotFound(TriggerId),

    /// The trigger exists but is inactive (manual path).
    #[error("trigger is inactive: {0}")]
    TriggerInactive(TriggerId),

    /// The submission was malformed (unknown event name, invalid trigger).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A trigger or workspace store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The execution log could not be written or read.
    #[error("execution log error: {0}")]
    Log(#[from] ExecutionLogError),

    /// The ingress was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}
