use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trigon_core::{ExecutionId, TenantId, TriggerId};

/// Terminal status of one trigger run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Error,
}

/// One immutable audit record of an attempt to run a trigger's actions.
///
/// Records are created exactly once, when a matched trigger finishes
/// running (successfully or not), and are never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Unique identifier for this record (UUID v4).
    pub id: ExecutionId,

    /// The trigger this run belongs to.
    pub trigger_id: TriggerId,

    /// Tenant owning the trigger (denormalized for scoped queries).
    pub tenant: TenantId,

    /// Trigger display name at run time (denormalized).
    pub trigger_name: String,

    /// Whether the full action list completed.
    pub status: ExecutionStatus,

    /// When the run finished.
    pub executed_at: DateTime<Utc>,

    /// The payload that triggered the run.
    pub event_data: serde_json::Value,

    /// Per-action outcomes on success; partial outcomes plus failure
    /// detail on error.
    pub result: serde_json::Value,
}

/// Query parameters for searching execution records.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExecutionQuery {
    /// Filter by tenant.
    pub tenant: Option<TenantId>,
    /// Filter by trigger.
    pub trigger: Option<TriggerId>,
    /// Filter by status.
    pub status: Option<ExecutionStatus>,
    /// Only records executed at or after this time.
    pub from: Option<DateTime<Utc>>,
    /// Only records executed at or before this time.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of records to return (default 50, max 1000).
    pub limit: Option<u32>,
    /// Number of records to skip for pagination.
    pub offset: Option<u32>,
}

impl ExecutionQuery {
    /// Return the effective limit, clamped to 1..=1000, defaulting to 50.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(50).clamp(1, 1000)
    }

    /// Return the effective offset, defaulting to 0.
    #[must_use]
    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// A paginated page of execution records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPage {
    /// The records matching the query, newest first.
    pub records: Vec<ExecutionRecord>,
    /// Total number of records matching the query (before pagination).
    pub total: u64,
    /// The limit used for this page.
    pub limit: u32,
    /// The offset used for this page.
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn query_limit_clamps() {
        let query = ExecutionQuery {
            limit: Some(10_000),
            ..ExecutionQuery::default()
        };
        assert_eq!(query.effective_limit(), 1000);

        let query = ExecutionQuery {
            limit: Some(0),
            ..ExecutionQuery::default()
        };
        assert_eq!(query.effective_limit(), 1);

        assert_eq!(ExecutionQuery::default().effective_limit(), 50);
        assert_eq!(ExecutionQuery::default().effective_offset(), 0);
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = ExecutionRecord {
            id: ExecutionId::new("e-1"),
            trigger_id: TriggerId::new("t-1"),
            tenant: TenantId::new("tenant-a"),
            trigger_name: "daily digest".into(),
            status: ExecutionStatus::Success,
            executed_at: Utc::now(),
            event_data: serde_json::json!({}),
            result: serde_json::json!([{"index": 0, "action": "email", "detail": {}}]),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ExecutionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.status, record.status);
    }
}
