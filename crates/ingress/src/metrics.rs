use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking ingress activity.
///
/// All counters use relaxed ordering for maximum throughput. For a
/// consistent point-in-time view, call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct IngressMetrics {
    /// Inbound events accepted (tenant resolved, name valid).
    pub events_received: AtomicU64,
    /// Triggers matched across all events.
    pub triggers_matched: AtomicU64,
    /// Trigger runs that completed their whole action list.
    pub runs_succeeded: AtomicU64,
    /// Trigger runs halted by a failing action.
    pub runs_failed: AtomicU64,
    /// Runs started by the schedule sweep.
    pub schedule_runs: AtomicU64,
    /// Runs started through the manual path.
    pub manual_runs: AtomicU64,
}

impl IngressMetrics {
    /// Increment the received-events counter.
    pub fn increment_events(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the matched-triggers counter.
    pub fn increment_matched(&self) {
        self.triggers_matched.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the succeeded-runs counter.
    pub fn increment_succeeded(&self) {
        self.runs_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the failed-runs counter.
    pub fn increment_failed(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the schedule-runs counter.
    pub fn increment_schedule_runs(&self) {
        self.schedule_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the manual-runs counter.
    pub fn increment_manual_runs(&self) {
        self.manual_runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            triggers_matched: self.triggers_matched.load(Ordering::Relaxed),
            runs_succeeded: self.runs_succeeded.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            schedule_runs: self.schedule_runs.load(Ordering::Relaxed),
            manual_runs: self.manual_runs.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`IngressMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub triggers_matched: u64,
    pub runs_succeeded: u64,
    pub runs_failed: u64,
    pub schedule_runs: u64,
    pub manual_runs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let snap = IngressMetrics::default().snapshot();
        assert_eq!(snap.events_received, 0);
        assert_eq!(snap.triggers_matched, 0);
        assert_eq!(snap.runs_succeeded, 0);
        assert_eq!(snap.runs_failed, 0);
        assert_eq!(snap.schedule_runs, 0);
        assert_eq!(snap.manual_runs, 0);
    }

    #[test]
    fn increment_and_snapshot() {
        let metrics = IngressMetrics::default();
        metrics.increment_events();
        metrics.increment_events();
        metrics.increment_matched();
        metrics.increment_succeeded();
        metrics.increment_failed();
        metrics.increment_schedule_runs();
        metrics.increment_manual_runs();

        let snap = metrics.snapshot();
        assert_eq!(snap.events_received, 2);
        assert_eq!(snap.triggers_matched, 1);
        assert_eq!(snap.runs_succeeded, 1);
        assert_eq!(snap.runs_failed, 1);
        assert_eq!(snap.schedule_runs, 1);
        assert_eq!(snap.manual_runs, 1);
    }
}
