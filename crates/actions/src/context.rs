use std::collections::HashMap;

/// Accumulates named outputs from completed actions within one trigger run.
///
/// Actions later in the list may depend on effects of earlier ones (a
/// created task id referenced by a notification, say). The dispatcher
/// records every completed action's result descriptor here under the
/// action's kind name, making that coupling explicit instead of ambient.
/// When a run repeats a kind, the most recent completed action wins.
#[derive(Debug, Default)]
pub struct RunContext {
    outputs: HashMap<String, serde_json::Value>,
}

impl RunContext {
    /// Create an empty run context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent output recorded under an action kind, if any.
    #[must_use]
    pub fn output(&self, kind: &str) -> Option<&serde_json::Value> {
        self.outputs.get(kind)
    }

    /// Record a completed action's result descriptor.
    pub fn record(&mut self, kind: &str, detail: serde_json::Value) {
        self.outputs.insert(kind.to_owned(), detail);
    }

    /// All recorded outputs, keyed by action kind.
    #[must_use]
    pub fn outputs(&self) -> &HashMap<String, serde_json::Value> {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_read() {
        let mut ctx = RunContext::new();
        assert!(ctx.output("task_creation").is_none());

        ctx.record("task_creation", serde_json::json!({"task_id": "t-1"}));
        assert_eq!(
            ctx.output("task_creation").unwrap()["task_id"],
            "t-1"
        );
    }

    #[test]
    fn repeated_kind_keeps_latest() {
        let mut ctx = RunContext::new();
        ctx.record("email", serde_json::json!({"to": "a@example.com"}));
        ctx.record("email", serde_json::json!({"to": "b@example.com"}));
        assert_eq!(ctx.output("email").unwrap()["to"], "b@example.com");
        assert_eq!(ctx.outputs().len(), 1);
    }
}
