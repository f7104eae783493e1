use async_trait::async_trait;

use trigon_core::{ActionSpec, TenantId};

use crate::context::RunContext;
use crate::error::ActionError;

/// Everything a handler gets to see for one action execution.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// The decoded action configuration.
    pub spec: &'a ActionSpec,
    /// Tenant scope for any entity lookups the handler performs.
    pub tenant: &'a TenantId,
    /// The payload that triggered the run.
    pub event: &'a serde_json::Value,
    /// Outputs of the actions completed earlier in this run.
    pub context: &'a RunContext,
}

/// Trait implemented by each action type's executor.
///
/// Implementations must be `Send + Sync` so they can be shared behind the
/// handler registry. `execute` returns the result descriptor recorded in
/// the execution log, or the error that halts the run.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The action type this handler serves (`"email"`, `"webhook"`, ...),
    /// matching [`ActionSpec::kind`].
    fn kind(&self) -> &str;

    /// Execute one action.
    async fn execute(&self, invocation: &Invocation<'_>)
    -> Result<serde_json::Value, ActionError>;
}
