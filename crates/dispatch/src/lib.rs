pub mod dispatcher;

pub use dispatcher::{ActionDispatcher, DispatchHalt};
