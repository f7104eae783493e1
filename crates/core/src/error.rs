use thiserror::Error;

/// Errors raised when validating trigger definitions and inbound events.
///
/// Validation failures are synchronous and happen before anything is
/// persisted or dispatched; they never produce an execution record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The event name is not part of the closed domain event set.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),

    /// An event trigger was defined without an event kind.
    #[error("event triggers require an event kind")]
    MissingEventKind,

    /// A condition trigger was defined without a condition.
    #[error("condition triggers require a condition")]
    MissingCondition,

    /// A schedule trigger was defined without a schedule.
    #[error("schedule triggers require a schedule")]
    MissingSchedule,

    /// A trigger was defined with an empty action list.
    #[error("trigger requires at least one action")]
    EmptyActions,

    /// The schedule payload is internally inconsistent.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The time-of-day string could not be parsed.
    #[error("invalid time of day: {0}")]
    InvalidTime(String),
}
