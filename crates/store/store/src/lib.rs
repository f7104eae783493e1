pub mod error;
pub mod lock;
pub mod trigger_store;
pub mod workspace;

pub use error::StoreError;
pub use lock::{DistributedLock, LockGuard};
pub use trigger_store::TriggerStore;
pub use workspace::{NewTask, TaskRecord, WorkspaceStore};
