use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use trigon_core::ActionSpec;
use trigon_store::lock::DistributedLock;
use trigon_store::workspace::{NewTask, WorkspaceStore};

use crate::error::ActionError;
use crate::handler::{ActionHandler, Invocation};

/// TTL on the per-board lock; generous compared to a single insert.
const LOCK_TTL: Duration = Duration::from_secs(10);
/// How long to wait for the board lock before giving up.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Handler for the `task_creation` action type.
///
/// Validates that the referenced project belongs to the tenant, then — under
/// a per-board lock, so concurrent runs cannot race on position assignment —
/// appends a task at `max position + 1` (0 on an empty board).
pub struct TaskHandler {
    workspace: Arc<dyn WorkspaceStore>,
    lock: Arc<dyn DistributedLock>,
}

impl TaskHandler {
    /// Create a handler over the given workspace store and lock manager.
    pub fn new(workspace: Arc<dyn WorkspaceStore>, lock: Arc<dyn DistributedLock>) -> Self {
        Self { workspace, lock }
    }
}

#[async_trait]
impl ActionHandler for TaskHandler {
    fn kind(&self) -> &str {
        "task_creation"
    }

    #[instrument(skip(self, invocation), fields(tenant = %invocation.tenant))]
    async fn execute(
        &self,
        invocation: &Invocation<'_>,
    ) -> Result<serde_json::Value, ActionError> {
        let ActionSpec::TaskCreation {
            project_id,
            board_id,
            title,
            description,
            priority,
            assigned_to,
            due_date,
        } = invocation.spec
        else {
            return Err(ActionError::InvalidConfig(format!(
                "task handler received {} config",
                invocation.spec.kind()
            )));
        };

        let owned = self
            .workspace
            .project_in_tenant(invocation.tenant, project_id)
            .await?;
        if !owned {
            return Err(ActionError::NotFound(format!(
                "project {project_id} not found in tenant scope"
            )));
        }

        let lock_name = format!("board:{}:{}", invocation.tenant, board_id);
        let guard = self.lock.acquire(&lock_name, LOCK_TTL, LOCK_TIMEOUT).await?;

        let insert_result = async {
            let max = self.workspace.max_task_position(board_id).await?;
            let position = max.map_or(0, |p| p + 1);

            let task = NewTask {
                tenant: invocation.tenant.clone(),
                project: project_id.clone(),
                board: board_id.clone(),
                title: title.clone().unwrap_or_else(|| "Automated task".to_owned()),
                description: description.clone(),
                priority: priority.unwrap_or_default(),
                assigned_to: assigned_to.clone(),
                due_date: *due_date,
                position,
            };
            self.workspace.insert_task(task).await
        }
        .await;

        guard.release().await?;
        let record = insert_result?;

        debug!(task = %record.id, position = record.position, "task created");
        Ok(serde_json::json!({
            "task_id": record.id,
            "board_id": record.board,
            "position": record.position,
            "title": record.title,
        }))
    }
}
