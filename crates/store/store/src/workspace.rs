use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trigon_core::{BoardId, ProjectId, TaskId, TaskPriority, TenantId};

use crate::error::StoreError;

/// A task to be appended to a board. The position is assigned by the
/// caller, under the board's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub tenant: TenantId,
    pub project: ProjectId,
    pub board: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: TaskPriority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Ordinal position within the board (unique and contiguous).
    pub position: i64,
}

/// A persisted task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub tenant: TenantId,
    pub project: ProjectId,
    pub board: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: TaskPriority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

/// The minimal view of the surrounding CRUD layer the engine needs:
/// tenant existence, project ownership checks, and task insertion with
/// board-scoped position queries.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Whether the tenant exists at all.
    async fn tenant_exists(&self, tenant: &TenantId) -> Result<bool, StoreError>;

    /// Whether the project exists and belongs to the tenant.
    async fn project_in_tenant(
        &self,
        tenant: &TenantId,
        project: &ProjectId,
    ) -> Result<bool, StoreError>;

    /// Highest task position on the board, `None` when the board is empty.
    async fn max_task_position(&self, board: &BoardId) -> Result<Option<i64>, StoreError>;

    /// Persist a task. The caller has already assigned the position.
    async fn insert_task(&self, task: NewTask) -> Result<TaskRecord, StoreError>;
}
