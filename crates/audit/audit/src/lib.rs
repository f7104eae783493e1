pub mod error;
pub mod record;
pub mod store;

pub use error::ExecutionLogError;
pub use record::{ExecutionPage, ExecutionQuery, ExecutionRecord, ExecutionStatus};
pub use store::ExecutionStore;
