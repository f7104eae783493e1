use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use trigon_core::{BoardId, ProjectId, TaskId, TenantId};
use trigon_store::error::StoreError;
use trigon_store::workspace::{NewTask, TaskRecord, WorkspaceStore};

/// In-memory [`WorkspaceStore`] with seeding helpers for tests.
///
/// Holds just enough of the surrounding application's data — tenants,
/// project ownership, tasks — for the engine's lookups.
#[derive(Debug, Default)]
pub struct MemoryWorkspaceStore {
    tenants: DashMap<String, ()>,
    /// project id -> owning tenant id.
    projects: DashMap<String, String>,
    /// task id -> record.
    tasks: DashMap<String, TaskRecord>,
}

impl MemoryWorkspaceStore {
    /// Create a new, empty workspace store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant.
    pub fn add_tenant(&self, tenant: impl Into<TenantId>) {
        self.tenants.insert(tenant.into().to_string(), ());
    }

    /// Register a project under a tenant.
    pub fn add_project(&self, tenant: impl Into<TenantId>, project: impl Into<ProjectId>) {
        self.projects
            .insert(project.into().to_string(), tenant.into().to_string());
    }

    /// All tasks on a board, sorted by position. Test helper.
    #[must_use]
    pub fn tasks_on_board(&self, board: &BoardId) -> Vec<TaskRecord> {
        let mut found: Vec<TaskRecord> = self
            .tasks
            .iter()
            .filter(|entry| entry.board == *board)
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|task| task.position);
        found
    }
}

#[async_trait]
impl WorkspaceStore for MemoryWorkspaceStore {
    async fn tenant_exists(&self, tenant: &TenantId) -> Result<bool, StoreError> {
        Ok(self.tenants.contains_key(tenant.as_str()))
    }

    async fn project_in_tenant(
        &self,
        tenant: &TenantId,
        project: &ProjectId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .projects
            .get(project.as_str())
            .is_some_and(|owner| owner.value() == tenant.as_str()))
    }

    async fn max_task_position(&self, board: &BoardId) -> Result<Option<i64>, StoreError> {
        Ok(self
            .tasks
            .iter()
            .filter(|entry| entry.board == *board)
            .map(|entry| entry.position)
            .max())
    }

    async fn insert_task(&self, task: NewTask) -> Result<TaskRecord, StoreError> {
        let duplicate = self
            .tasks
            .iter()
            .any(|entry| entry.board == task.board && entry.position == task.position);
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "position {} already taken on board {}",
                task.position, task.board
            )));
        }

        let record = TaskRecord {
            id: TaskId::new(Uuid::new_v4().to_string()),
            tenant: task.tenant,
            project: task.project,
            board: task.board,
            title: task.title,
            description: task.description,
            priority: task.priority,
            assigned_to: task.assigned_to,
            due_date: task.due_date,
            position: task.position,
            created_at: Utc::now(),
        };
        self.tasks.insert(record.id.to_string(), record.clone());
        Ok(record)
    }
}
