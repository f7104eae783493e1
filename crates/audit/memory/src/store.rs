use async_trait::async_trait;
use dashmap::DashMap;

use trigon_audit::error::ExecutionLogError;
use trigon_audit::record::{ExecutionPage, ExecutionQuery, ExecutionRecord};
use trigon_audit::store::ExecutionStore;
use trigon_core::{ExecutionId, TriggerId};

/// In-memory execution log using `DashMap`. Suitable for development and
/// testing.
///
/// Records are stored in a concurrent hash map keyed by record ID, with a
/// secondary index from trigger ID to record IDs.
#[derive(Debug, Default)]
pub struct MemoryExecutionStore {
    /// Primary store: record ID -> `ExecutionRecord`.
    records: DashMap<String, ExecutionRecord>,
    /// Secondary index: trigger ID -> list of record IDs.
    trigger_index: DashMap<String, Vec<String>>,
}

impl MemoryExecutionStore {
    /// Create a new empty in-memory execution log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ExecutionStore for MemoryExecutionStore {
    async fn record(&self, entry: ExecutionRecord) -> Result<(), ExecutionLogError> {
        let id = entry.id.to_string();
        if self.records.contains_key(&id) {
            return Err(ExecutionLogError::Storage(format!(
                "execution {id} already recorded"
            )));
        }
        let trigger_id = entry.trigger_id.to_string();
        self.records.insert(id.clone(), entry);
        self.trigger_index.entry(trigger_id).or_default().push(id);
        Ok(())
    }

    async fn get(&self, id: &ExecutionId) -> Result<Option<ExecutionRecord>, ExecutionLogError> {
        Ok(self.records.get(id.as_str()).map(|r| r.value().clone()))
    }

    async fn latest_for_trigger(
        &self,
        trigger: &TriggerId,
    ) -> Result<Option<ExecutionRecord>, ExecutionLogError> {
        let Some(ids) = self.trigger_index.get(trigger.as_str()) else {
            return Ok(None);
        };

        let mut best: Option<ExecutionRecord> = None;
        for id in ids.value() {
            if let Some(rec) = self.records.get(id) {
                let rec = rec.value();
                if best
                    .as_ref()
                    .is_none_or(|b| rec.executed_at > b.executed_at)
                {
                    best = Some(rec.clone());
                }
            }
        }
        Ok(best)
    }

    async fn query(&self, query: &ExecutionQuery) -> Result<ExecutionPage, ExecutionLogError> {
        let limit = query.effective_limit();
        let offset = query.effective_offset();

        let mut matching: Vec<ExecutionRecord> = self
            .records
            .iter()
            .filter_map(|entry| {
                let rec = entry.value();
                if let Some(ref tenant) = query.tenant {
                    if rec.tenant != *tenant {
                        return None;
                    }
                }
                if let Some(ref trigger) = query.trigger {
                    if rec.trigger_id != *trigger {
                        return None;
                    }
                }
                if let Some(status) = query.status {
                    if rec.status != status {
                        return None;
                    }
                }
                if let Some(ref from) = query.from {
                    if rec.executed_at < *from {
                        return None;
                    }
                }
                if let Some(ref to) = query.to {
                    if rec.executed_at > *to {
                        return None;
                    }
                }
                Some(rec.clone())
            })
            .collect();

        // Newest first.
        matching.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));

        let total = matching.len() as u64;
        let records: Vec<ExecutionRecord> = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(ExecutionPage {
            records,
            total,
            limit,
            offset,
        })
    }
}
