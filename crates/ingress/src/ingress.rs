use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use trigon_audit::record::{ExecutionRecord, ExecutionStatus};
use trigon_audit::store::ExecutionStore;
use trigon_core::{Event, EventKind, ExecutionId, TenantId, Trigger, TriggerId, TriggerKind};
use trigon_dispatch::ActionDispatcher;
use trigon_store::trigger_store::TriggerStore;
use trigon_store::workspace::WorkspaceStore;

use crate::error::IngressError;
use crate::metrics::IngressMetrics;

/// What the ingress reports back per matched trigger.
///
/// Returned for every matched trigger regardless of how its run went; a
/// failing run shows up here as `status = error`, never as a raised error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRunSummary {
    /// The trigger that ran.
    pub trigger_id: TriggerId,
    /// Trigger display name.
    pub name: String,
    /// Terminal status of the run.
    pub status: ExecutionStatus,
    /// The execution record written for this run.
    pub execution_id: ExecutionId,
    /// How many actions completed (on error: before the failing one).
    pub actions_run: usize,
}

/// The entry point of the automation engine.
///
/// Matches inbound events and schedule ticks to triggers, runs each matched
/// trigger's action list through the dispatcher, and appends one execution
/// record per run. Within one invocation the matched triggers run
/// sequentially; each trigger's record is written before the next trigger
/// starts, and one trigger's failure never affects another.
pub struct Ingress {
    pub(crate) triggers: Arc<dyn TriggerStore>,
    pub(crate) workspace: Arc<dyn WorkspaceStore>,
    pub(crate) executions: Arc<dyn ExecutionStore>,
    pub(crate) dispatcher: ActionDispatcher,
    pub(crate) metrics: Arc<IngressMetrics>,
}

impl std::fmt::Debug for Ingress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingress")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Ingress {
    /// Submit an event whose name has not been parsed yet.
    ///
    /// Rejects names outside the closed event set with a validation error
    /// before any trigger lookup.
    pub async fn ingest_named(
        &self,
        tenant: &TenantId,
        event_name: &str,
        data: serde_json::Value,
        source: Option<String>,
    ) -> Result<Vec<TriggerRunSummary>, IngressError> {
        let kind = EventKind::from_str(event_name)?;
        self.ingest(tenant, kind, data, source).await
    }

    /// Submit a domain event for a tenant and run every matching trigger.
    ///
    /// Matching rules: webhook triggers always match; event triggers match
    /// on their event kind; condition triggers match when their predicate
    /// holds against the payload. Schedule triggers never match this path.
    ///
    /// Returns one summary per matched trigger. Individual trigger
    /// failures are recorded, not raised; only infrastructural errors (an
    /// unknown tenant, a store failure) surface as `Err`.
    #[instrument(skip_all, fields(tenant = %tenant, event = %kind))]
    pub async fn ingest(
        &self,
        tenant: &TenantId,
        kind: EventKind,
        data: serde_json::Value,
        source: Option<String>,
    ) -> Result<Vec<TriggerRunSummary>, IngressError> {
        if !self.workspace.tenant_exists(tenant).await? {
            return Err(IngressError::TenantNotFound(tenant.clone()));
        }
        self.metrics.increment_events();

        let mut event = Event::new(tenant.clone(), kind, data);
        event.source = source;

        let candidates = self.triggers.list_active(tenant).await?;
        let matched: Vec<Trigger> = candidates
            .into_iter()
            .filter(|trigger| matches_event(trigger, &event))
            .collect();

        info!(matched = matched.len(), "event matched triggers");

        let mut summaries = Vec::with_capacity(matched.len());
        for trigger in &matched {
            self.metrics.increment_matched();
            summaries.push(self.run_and_record(trigger, &event.data).await?);
        }
        Ok(summaries)
    }

    /// One schedule sweep: run every active schedule trigger, across all
    /// tenants, that is due at `reference`.
    ///
    /// The "last run" input to due-checking is derived from the execution
    /// log, so a sweep that fires a trigger makes the next sweep see it as
    /// already run.
    #[instrument(skip(self))]
    pub async fn tick(
        &self,
        reference: DateTime<Utc>,
    ) -> Result<Vec<TriggerRunSummary>, IngressError> {
        let candidates = self.triggers.list_active_schedules().await?;

        let mut summaries = Vec::new();
        for trigger in &candidates {
            let Some(schedule) = &trigger.schedule else {
                warn!(trigger = %trigger.id, "schedule trigger without schedule payload");
                continue;
            };

            let last_run = self
                .executions
                .latest_for_trigger(&trigger.id)
                .await?
                .map(|record| record.executed_at);

            if !trigon_rules::is_due(schedule, reference, last_run) {
                continue;
            }

            info!(trigger = %trigger.id, tenant = %trigger.tenant, "schedule trigger due");
            self.metrics.increment_schedule_runs();
            summaries.push(
                self.run_and_record(trigger, &serde_json::json!({}))
                    .await?,
            );
        }
        Ok(summaries)
    }

    /// Run one trigger immediately, bypassing all matching.
    ///
    /// A debugging affordance: the trigger must exist in tenant scope and
    /// be active. Re-running a previously failed trigger replays the whole
    /// action list, including actions that already succeeded — side
    /// effects can duplicate.
    #[instrument(skip_all, fields(tenant = %tenant, trigger = %trigger_id))]
    pub async fn run_manual(
        &self,
        tenant: &TenantId,
        trigger_id: &TriggerId,
        event_data: Option<serde_json::Value>,
    ) -> Result<TriggerRunSummary, IngressError> {
        let trigger = self
            .triggers
            .get(tenant, trigger_id)
            .await?
            .ok_or_else(|| IngressError::TriggerNotFound(trigger_id.clone()))?;

        if !trigger.is_active {
            return Err(IngressError::TriggerInactive(trigger_id.clone()));
        }

        self.metrics.increment_manual_runs();
        let data = event_data.unwrap_or_else(|| serde_json::json!({}));
        self.run_and_record(&trigger, &data).await
    }

    /// Return a reference to the ingress metrics.
    #[must_use]
    pub fn metrics(&self) -> &IngressMetrics {
        &self.metrics
    }

    /// Dispatch one trigger's actions and append the execution record.
    ///
    /// The record write happens-after the dispatch and before this method
    /// returns; callers iterating several triggers therefore get the
    /// run-then-record cycle completed per trigger.
    async fn run_and_record(
        &self,
        trigger: &Trigger,
        event_data: &serde_json::Value,
    ) -> Result<TriggerRunSummary, IngressError> {
        let dispatch = self
            .dispatcher
            .run(&trigger.actions, &trigger.tenant, event_data)
            .await;

        let (status, result, actions_run) = match dispatch {
            Ok(outcomes) => {
                let actions_run = outcomes.len();
                let result = serde_json::to_value(&outcomes).unwrap_or_default();
                self.metrics.increment_succeeded();
                (ExecutionStatus::Success, result, actions_run)
            }
            Err(halt) => {
                warn!(
                    trigger = %trigger.id,
                    failed_action = halt.failure.index,
                    code = %halt.failure.code,
                    "trigger run halted"
                );
                let actions_run = halt.completed.len();
                let result = serde_json::json!({
                    "completed": halt.completed,
                    "error": halt.failure,
                });
                self.metrics.increment_failed();
                (ExecutionStatus::Error, result, actions_run)
            }
        };

        let record = ExecutionRecord {
            id: ExecutionId::new(Uuid::new_v4().to_string()),
            trigger_id: trigger.id.clone(),
            tenant: trigger.tenant.clone(),
            trigger_name: trigger.name.clone(),
            status,
            executed_at: Utc::now(),
            event_data: event_data.clone(),
            result,
        };
        let execution_id = record.id.clone();
        self.executions.record(record).await?;

        Ok(TriggerRunSummary {
            trigger_id: trigger.id.clone(),
            name: trigger.name.clone(),
            status,
            execution_id,
            actions_run,
        })
    }
}

/// Does this trigger react to this event?
fn matches_event(trigger: &Trigger, event: &Event) -> bool {
    match trigger.kind {
        TriggerKind::Webhook => true,
        TriggerKind::Event => trigger.event == Some(event.kind),
        TriggerKind::Condition => trigger
            .condition
            .as_ref()
            .is_some_and(|condition| trigon_rules::matches(condition, &event.data)),
        TriggerKind::Schedule => false,
    }
}
