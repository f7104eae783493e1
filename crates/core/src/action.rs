use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BoardId, ProjectId};

/// Priority assigned to tasks created by the `task_creation` action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// One typed, configurable step within a trigger's action list.
///
/// The wire shape is `{"type": ..., "config": {...}}`; each variant carries
/// the strongly-typed config payload for its action type. Unknown types fail
/// at the trigger-definition boundary, so the dispatcher never needs dynamic
/// field lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum ActionSpec {
    /// Send an email rendered from a template against the event payload.
    Email {
        to: String,
        subject: String,
        template: String,
    },

    /// POST the event payload to an external URL.
    Webhook {
        url: String,
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        headers: HashMap<String, String>,
    },

    /// Create a task on a kanban board, appended at the next position.
    TaskCreation {
        project_id: ProjectId,
        board_id: BoardId,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        priority: Option<TaskPriority>,
        #[serde(default)]
        assigned_to: Option<String>,
        #[serde(default)]
        due_date: Option<DateTime<Utc>>,
    },

    /// Record an in-app notification for a recipient.
    Notification {
        recipient: String,
        message: String,
        notification_type: String,
    },

    /// Delegate to the content-generation collaborator.
    AiGeneration {
        agent: String,
        prompt: String,
        output_type: String,
    },
}

impl ActionSpec {
    /// The snake_case discriminator for this action type, matching the wire
    /// `type` field and the handler registry key.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email { .. } => "email",
            Self::Webhook { .. } => "webhook",
            Self::TaskCreation { .. } => "task_creation",
            Self::Notification { .. } => "notification",
            Self::AiGeneration { .. } => "ai_generation",
        }
    }
}
