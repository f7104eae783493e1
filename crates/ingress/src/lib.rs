pub mod builder;
pub mod error;
pub mod ingress;
pub mod metrics;
pub mod scheduler;

pub use builder::IngressBuilder;
pub use error::IngressError;
pub use ingress::{Ingress, TriggerRunSummary};
pub use metrics::{IngressMetrics, MetricsSnapshot};
pub use scheduler::Scheduler;
