pub mod condition;
pub mod schedule;

pub use condition::matches;
pub use schedule::is_due;
