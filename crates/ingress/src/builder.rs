use std::sync::Arc;

use trigon_actions::{ActionHandler, HandlerRegistry};
use trigon_audit::store::ExecutionStore;
use trigon_dispatch::ActionDispatcher;
use trigon_store::trigger_store::TriggerStore;
use trigon_store::workspace::WorkspaceStore;

use crate::error::IngressError;
use crate::ingress::Ingress;
use crate::metrics::IngressMetrics;

/// Fluent builder for constructing an [`Ingress`] instance.
///
/// A trigger store, a workspace store and an execution store must be
/// supplied; handlers are registered one by one. Building without a
/// required component fails with [`IngressError::Configuration`].
pub struct IngressBuilder {
    triggers: Option<Arc<dyn TriggerStore>>,
    workspace: Option<Arc<dyn WorkspaceStore>>,
    executions: Option<Arc<dyn ExecutionStore>>,
    handlers: HandlerRegistry,
}

impl IngressBuilder {
    /// Create a new builder with no components set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            triggers: None,
            workspace: None,
            executions: None,
            handlers: HandlerRegistry::new(),
        }
    }

    /// Set the trigger store implementation.
    #[must_use]
    pub fn triggers(mut self, store: Arc<dyn TriggerStore>) -> Self {
        self.triggers = Some(store);
        self
    }

    /// Set the workspace store implementation.
    #[must_use]
    pub fn workspace(mut self, store: Arc<dyn WorkspaceStore>) -> Self {
        self.workspace = Some(store);
        self
    }

    /// Set the execution log implementation.
    #[must_use]
    pub fn executions(mut self, store: Arc<dyn ExecutionStore>) -> Self {
        self.executions = Some(store);
        self
    }

    /// Register an action handler.
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn ActionHandler>) -> Self {
        self.handlers.register(handler);
        self
    }

    /// Consume the builder and produce a configured [`Ingress`].
    pub fn build(self) -> Result<Ingress, IngressError> {
        let triggers = self
            .triggers
            .ok_or_else(|| IngressError::Configuration("trigger store is required".into()))?;
        let workspace = self
            .workspace
            .ok_or_else(|| IngressError::Configuration("workspace store is required".into()))?;
        let executions = self
            .executions
            .ok_or_else(|| IngressError::Configuration("execution store is required".into()))?;

        Ok(Ingress {
            triggers,
            workspace,
            executions,
            dispatcher: ActionDispatcher::new(self.handlers),
            metrics: Arc::new(IngressMetrics::default()),
        })
    }
}

impl Default for IngressBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigon_audit_memory::MemoryExecutionStore;
    use trigon_store_memory::{MemoryTriggerStore, MemoryWorkspaceStore};

    #[test]
    fn build_missing_triggers_returns_error() {
        let result = IngressBuilder::new()
            .workspace(Arc::new(MemoryWorkspaceStore::new()))
            .executions(Arc::new(MemoryExecutionStore::new()))
            .build();
        let err = result.err().expect("build should fail");
        assert!(err.to_string().contains("trigger store is required"));
    }

    #[test]
    fn build_missing_executions_returns_error() {
        let result = IngressBuilder::new()
            .triggers(Arc::new(MemoryTriggerStore::new()))
            .workspace(Arc::new(MemoryWorkspaceStore::new()))
            .build();
        let err = result.err().expect("build should fail");
        assert!(err.to_string().contains("execution store is required"));
    }

    #[test]
    fn build_with_required_components_succeeds() {
        let result = IngressBuilder::new()
            .triggers(Arc::new(MemoryTriggerStore::new()))
            .workspace(Arc::new(MemoryWorkspaceStore::new()))
            .executions(Arc::new(MemoryExecutionStore::new()))
            .build();
        assert!(result.is_ok());
    }
}
