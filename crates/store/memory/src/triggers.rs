use async_trait::async_trait;
use dashmap::DashMap;

use trigon_core::{TenantId, Trigger, TriggerId, TriggerKind};
use trigon_store::error::StoreError;
use trigon_store::trigger_store::TriggerStore;

/// In-memory [`TriggerStore`] backed by a [`DashMap`]. Suitable for
/// development and testing.
#[derive(Debug, Default)]
pub struct MemoryTriggerStore {
    triggers: DashMap<String, Trigger>,
}

impl MemoryTriggerStore {
    /// Create a new, empty in-memory trigger store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored triggers, any tenant.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[async_trait]
impl TriggerStore for MemoryTriggerStore {
    async fn put(&self, trigger: Trigger) -> Result<(), StoreError> {
        self.triggers.insert(trigger.id.to_string(), trigger);
        Ok(())
    }

    async fn get(
        &self,
        tenant: &TenantId,
        id: &TriggerId,
    ) -> Result<Option<Trigger>, StoreError> {
        Ok(self
            .triggers
            .get(id.as_str())
            .filter(|entry| entry.tenant == *tenant)
            .map(|entry| entry.value().clone()))
    }

    async fn list_active(&self, tenant: &TenantId) -> Result<Vec<Trigger>, StoreError> {
        let mut found: Vec<Trigger> = self
            .triggers
            .iter()
            .filter(|entry| entry.tenant == *tenant && entry.is_active)
            .map(|entry| entry.value().clone())
            .collect();
        // Stable output order for callers and tests.
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn list_active_schedules(&self) -> Result<Vec<Trigger>, StoreError> {
        let mut found: Vec<Trigger> = self
            .triggers
            .iter()
            .filter(|entry| entry.is_active && entry.kind == TriggerKind::Schedule)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn remove(&self, tenant: &TenantId, id: &TriggerId) -> Result<bool, StoreError> {
        let removed = self
            .triggers
            .remove_if(id.as_str(), |_, trigger| trigger.tenant == *tenant);
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigon_core::ActionSpec;

    fn notify() -> Vec<ActionSpec> {
        vec![ActionSpec::Notification {
            recipient: "owner".into(),
            message: "ping".into(),
            notification_type: "info".into(),
        }]
    }

    #[tokio::test]
    async fn put_and_get_in_tenant_scope() {
        let store = MemoryTriggerStore::new();
        let trigger = Trigger::new("tenant-a", "t", TriggerKind::Webhook, notify());
        let id = trigger.id.clone();
        store.put(trigger).await.unwrap();

        let found = store.get(&"tenant-a".into(), &id).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn cross_tenant_get_is_none() {
        let store = MemoryTriggerStore::new();
        let trigger = Trigger::new("tenant-a", "t", TriggerKind::Webhook, notify());
        let id = trigger.id.clone();
        store.put(trigger).await.unwrap();

        let found = store.get(&"tenant-b".into(), &id).await.unwrap();
        assert!(found.is_none(), "other tenants must not see the trigger");
    }

    #[tokio::test]
    async fn cross_tenant_remove_is_noop() {
        let store = MemoryTriggerStore::new();
        let trigger = Trigger::new("tenant-a", "t", TriggerKind::Webhook, notify());
        let id = trigger.id.clone();
        store.put(trigger).await.unwrap();

        assert!(!store.remove(&"tenant-b".into(), &id).await.unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.remove(&"tenant-a".into(), &id).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_active_skips_inactive_and_other_tenants() {
        let store = MemoryTriggerStore::new();
        store
            .put(Trigger::new("tenant-a", "on", TriggerKind::Webhook, notify()))
            .await
            .unwrap();
        store
            .put(
                Trigger::new("tenant-a", "off", TriggerKind::Webhook, notify())
                    .deactivated(),
            )
            .await
            .unwrap();
        store
            .put(Trigger::new("tenant-b", "other", TriggerKind::Webhook, notify()))
            .await
            .unwrap();

        let active = store.list_active(&"tenant-a".into()).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "on");
    }

    #[tokio::test]
    async fn schedule_scan_spans_tenants() {
        let store = MemoryTriggerStore::new();
        for tenant in ["tenant-a", "tenant-b"] {
            store
                .put(Trigger::new(tenant, "digest", TriggerKind::Schedule, notify()))
                .await
                .unwrap();
        }
        store
            .put(Trigger::new("tenant-a", "hook", TriggerKind::Webhook, notify()))
            .await
            .unwrap();

        let schedules = store.list_active_schedules().await.unwrap();
        assert_eq!(schedules.len(), 2);
        let tenants: Vec<&str> = schedules.iter().map(|t| t.tenant.as_str()).collect();
        assert!(tenants.contains(&"tenant-a") && tenants.contains(&"tenant-b"));
    }
}
