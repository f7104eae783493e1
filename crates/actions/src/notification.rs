use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, instrument};

use trigon_core::{ActionSpec, TenantId};

use crate::error::ActionError;
use crate::handler::{ActionHandler, Invocation};

/// A notification addressed to someone in the tenant's workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub tenant: TenantId,
    pub recipient: String,
    pub message: String,
    pub notification_type: String,
}

/// Delivery seam for notifications. Fire-and-forget from the engine's
/// perspective: a sink that accepted the notification is success.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Record or deliver one notification.
    async fn deliver(&self, notification: Notification) -> Result<(), ActionError>;
}

/// A sink that keeps every delivered notification in memory. Used in dev
/// setups and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: Notification) -> Result<(), ActionError> {
        self.delivered
            .lock()
            .expect("sink mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Handler for the `notification` action type.
pub struct NotificationHandler {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationHandler {
    /// Create a handler delivering through the given sink.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl ActionHandler for NotificationHandler {
    fn kind(&self) -> &str {
        "notification"
    }

    #[instrument(skip(self, invocation), fields(tenant = %invocation.tenant))]
    async fn execute(
        &self,
        invocation: &Invocation<'_>,
    ) -> Result<serde_json::Value, ActionError> {
        let ActionSpec::Notification {
            recipient,
            message,
            notification_type,
        } = invocation.spec
        else {
            return Err(ActionError::InvalidConfig(format!(
                "notification handler received {} config",
                invocation.spec.kind()
            )));
        };

        self.sink
            .deliver(Notification {
                tenant: invocation.tenant.clone(),
                recipient: recipient.clone(),
                message: message.clone(),
                notification_type: notification_type.clone(),
            })
            .await?;

        debug!(recipient = %recipient, "notification recorded");
        Ok(serde_json::json!({
            "notified": recipient,
            "notification_type": notification_type,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunContext;

    #[tokio::test]
    async fn delivers_through_sink() {
        let sink = Arc::new(RecordingSink::new());
        let handler = NotificationHandler::new(Arc::clone(&sink) as Arc<dyn NotificationSink>);

        let spec = ActionSpec::Notification {
            recipient: "account-manager".into(),
            message: "Project completed".into(),
            notification_type: "success".into(),
        };
        let tenant = TenantId::new("tenant-a");
        let event = serde_json::json!({});
        let ctx = RunContext::new();

        let detail = handler
            .execute(&Invocation {
                spec: &spec,
                tenant: &tenant,
                event: &event,
                context: &ctx,
            })
            .await
            .unwrap();
        assert_eq!(detail["notified"], "account-manager");

        let delivered = sink.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].message, "Project completed");
        assert_eq!(delivered[0].tenant.as_str(), "tenant-a");
    }
}
