use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::ActionHandler;

/// A registry that maps action kinds to their handler implementations.
///
/// Handlers are stored behind `Arc<dyn ActionHandler>` so they can be
/// shared across tasks safely. The registry itself is not thread-safe for
/// mutation; it is intended to be built once at startup and then shared as
/// an immutable reference or wrapped in an `Arc`.
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. The handler's kind (from [`ActionHandler::kind`])
    /// is used as the lookup key.
    ///
    /// If a handler with the same kind already exists, it is replaced.
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        let kind = handler.kind().to_owned();
        self.handlers.insert(kind, handler);
    }

    /// Look up a handler by action kind.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(kind).cloned()
    }

    /// Return a sorted list of all registered kinds.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Return the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Return `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::ActionError;
    use crate::handler::Invocation;

    struct StubHandler {
        stub_kind: String,
    }

    impl StubHandler {
        fn new(kind: &str) -> Self {
            Self {
                stub_kind: kind.to_owned(),
            }
        }
    }

    #[async_trait]
    impl ActionHandler for StubHandler {
        fn kind(&self) -> &str {
            &self.stub_kind
        }

        async fn execute(
            &self,
            _invocation: &Invocation<'_>,
        ) -> Result<serde_json::Value, ActionError> {
            Ok(serde_json::json!({"stub": true}))
        }
    }

    #[test]
    fn empty_registry() {
        let reg = HandlerRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.list().is_empty());
    }

    #[test]
    fn register_and_get() {
        let mut reg = HandlerRegistry::new();
        reg.register(Arc::new(StubHandler::new("email")));
        reg.register(Arc::new(StubHandler::new("webhook")));

        assert_eq!(reg.len(), 2);
        let handler = reg.get("email").expect("email handler should exist");
        assert_eq!(handler.kind(), "email");
        assert!(reg.get("sms").is_none());
    }

    #[test]
    fn list_sorted() {
        let mut reg = HandlerRegistry::new();
        reg.register(Arc::new(StubHandler::new("webhook")));
        reg.register(Arc::new(StubHandler::new("email")));
        reg.register(Arc::new(StubHandler::new("notification")));

        assert_eq!(reg.list(), vec!["email", "notification", "webhook"]);
    }

    #[test]
    fn register_replaces_existing() {
        let mut reg = HandlerRegistry::new();
        reg.register(Arc::new(StubHandler::new("email")));
        reg.register(Arc::new(StubHandler::new("email")));
        assert_eq!(reg.len(), 1);
    }
}
