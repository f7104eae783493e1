use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::TenantId;

/// The closed set of domain events a trigger can react to.
///
/// Inbound submissions carrying a name outside this set are rejected at the
/// ingress boundary with [`ValidationError::UnknownEventKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ClientCreated,
    ClientArchived,
    ProjectCreated,
    ProjectCompleted,
    RevenueAdded,
    TaskCompleted,
    DeadlineApproaching,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::ClientCreated,
        Self::ClientArchived,
        Self::ProjectCreated,
        Self::ProjectCompleted,
        Self::RevenueAdded,
        Self::TaskCompleted,
        Self::DeadlineApproaching,
    ];

    /// Return the snake_case wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientCreated => "client_created",
            Self::ClientArchived => "client_archived",
            Self::ProjectCreated => "project_created",
            Self::ProjectCompleted => "project_completed",
            Self::RevenueAdded => "revenue_added",
            Self::TaskCompleted => "task_completed",
            Self::DeadlineApproaching => "deadline_approaching",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownEventKind(s.to_owned()))
    }
}

/// An inbound event envelope: something happened in a tenant's workspace.
///
/// The `data` payload is opaque structured data; condition triggers inspect
/// it and every matched trigger's actions receive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Tenant the event belongs to.
    pub tenant: TenantId,

    /// Which domain event occurred.
    pub kind: EventKind,

    /// Opaque event payload.
    pub data: serde_json::Value,

    /// Optional label for the submitting system.
    #[serde(default)]
    pub source: Option<String>,

    /// When the event was received.
    pub received_at: DateTime<Utc>,
}

impl Event {
    /// Create a new event stamped with the current instant.
    #[must_use]
    pub fn new(tenant: impl Into<TenantId>, kind: EventKind, data: serde_json::Value) -> Self {
        Self {
            tenant: tenant.into(),
            kind,
            data,
            source: None,
            received_at: Utc::now(),
        }
    }

    /// Set the submitting source label.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_known() {
        let kind: EventKind = "revenue_added".parse().unwrap();
        assert_eq!(kind, EventKind::RevenueAdded);
    }

    #[test]
    fn kind_parse_unknown() {
        let err = "invoice_exploded".parse::<EventKind>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownEventKind("invoice_exploded".into())
        );
    }

    #[test]
    fn kind_display_matches_parse() {
        for kind in EventKind::ALL {
            let back: EventKind = kind.to_string().parse().unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&EventKind::ClientCreated).unwrap();
        assert_eq!(json, "\"client_created\"");
    }

    #[test]
    fn event_creation() {
        let event = Event::new(
            "tenant-1",
            EventKind::TaskCompleted,
            serde_json::json!({"task": "t-9"}),
        )
        .with_source("kanban");
        assert_eq!(event.tenant.as_str(), "tenant-1");
        assert_eq!(event.source.as_deref(), Some("kanban"));
    }
}
