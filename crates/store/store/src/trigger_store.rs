use async_trait::async_trait;

use trigon_core::{TenantId, Trigger, TriggerId};

use crate::error::StoreError;

/// Trait for trigger persistence backends.
///
/// Every read is scoped by tenant; there is deliberately no way to fetch a
/// trigger without naming its owner, except for the global schedule scan
/// used by the scheduler (which returns triggers carrying their tenant id).
#[async_trait]
pub trait TriggerStore: Send + Sync {
    /// Insert or replace a trigger.
    async fn put(&self, trigger: Trigger) -> Result<(), StoreError>;

    /// Fetch one trigger in tenant scope. Returns `None` when the id does
    /// not exist or belongs to a different tenant.
    async fn get(&self, tenant: &TenantId, id: &TriggerId)
    -> Result<Option<Trigger>, StoreError>;

    /// All active triggers for a tenant, any kind.
    async fn list_active(&self, tenant: &TenantId) -> Result<Vec<Trigger>, StoreError>;

    /// Single global scan: every active schedule-kind trigger across all
    /// tenants, each carrying its own tenant id.
    async fn list_active_schedules(&self) -> Result<Vec<Trigger>, StoreError>;

    /// Delete a trigger in tenant scope. Returns `true` if it existed.
    async fn remove(&self, tenant: &TenantId, id: &TriggerId) -> Result<bool, StoreError>;
}
