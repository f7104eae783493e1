use thiserror::Error;
use tracing::{debug, instrument, warn};

use trigon_actions::{HandlerRegistry, Invocation, RunContext};
use trigon_core::{ActionFailure, ActionOutcome, ActionSpec, TenantId};

/// A trigger run stopped at a failing action.
///
/// `completed` holds the outcomes of the actions that already ran. Their
/// side effects are real and are not rolled back: the engine is
/// deliberately fail-fast with no compensation.
#[derive(Debug, Error)]
#[error("action {} ({}) failed: {}", .failure.index, .failure.action, .failure.message)]
pub struct DispatchHalt {
    /// Outcomes of the actions completed before the failure, in order.
    pub completed: Vec<ActionOutcome>,
    /// Detail of the action that halted the run.
    pub failure: ActionFailure,
}

/// Executes one trigger's ordered action list.
///
/// Actions run strictly sequentially, in declaration order — no action
/// starts before the previous one returns, because later actions may
/// depend on earlier effects. The first failure stops the run; there are
/// no dispatcher-level retries and no whole-sequence timeout (handlers
/// that need a bound, like the outbound webhook, carry their own).
pub struct ActionDispatcher {
    registry: HandlerRegistry,
}

impl ActionDispatcher {
    /// Create a dispatcher over the given handler registry.
    #[must_use]
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Return a reference to the handler registry.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run an action list against an event payload in tenant scope.
    ///
    /// On success, returns one [`ActionOutcome`] per action, in declaration
    /// order. On failure, returns a [`DispatchHalt`] carrying the partial
    /// outcome list and the failing action's detail; remaining actions are
    /// never attempted.
    #[instrument(skip_all, fields(tenant = %tenant, actions = actions.len()))]
    pub async fn run(
        &self,
        actions: &[ActionSpec],
        tenant: &TenantId,
        event: &serde_json::Value,
    ) -> Result<Vec<ActionOutcome>, DispatchHalt> {
        let mut context = RunContext::new();
        let mut completed = Vec::with_capacity(actions.len());

        for (index, spec) in actions.iter().enumerate() {
            let kind = spec.kind();

            let Some(handler) = self.registry.get(kind) else {
                warn!(index, kind, "no handler registered for action type");
                return Err(DispatchHalt {
                    completed,
                    failure: ActionFailure {
                        index,
                        action: kind.to_owned(),
                        code: "CONFIGURATION".to_owned(),
                        message: format!("unknown action type: {kind}"),
                        retryable: false,
                    },
                });
            };

            let invocation = Invocation {
                spec,
                tenant,
                event,
                context: &context,
            };

            match handler.execute(&invocation).await {
                Ok(detail) => {
                    debug!(index, kind, "action completed");
                    context.record(kind, detail.clone());
                    completed.push(ActionOutcome {
                        index,
                        action: kind.to_owned(),
                        detail,
                    });
                }
                Err(err) => {
                    warn!(index, kind, error = %err, "action failed, halting run");
                    return Err(DispatchHalt {
                        completed,
                        failure: ActionFailure {
                            index,
                            action: kind.to_owned(),
                            code: err.code().to_owned(),
                            message: err.to_string(),
                            retryable: err.is_retryable(),
                        },
                    });
                }
            }
        }

        Ok(completed)
    }
}
