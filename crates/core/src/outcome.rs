use serde::{Deserialize, Serialize};

/// The result of one successfully executed action within a trigger run.
///
/// Outcomes are collected in declaration order; a run that fails partway
/// still carries the outcomes produced before the failing action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Zero-based position in the trigger's action list.
    pub index: usize,
    /// Action type discriminator (e.g. `"email"`).
    pub action: String,
    /// Handler-specific result descriptor.
    pub detail: serde_json::Value,
}

/// Detail of the action that halted a trigger run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFailure {
    /// Zero-based position of the failing action.
    pub index: usize,
    /// Action type discriminator of the failing action.
    pub action: String,
    /// Short error code (e.g. `"CONNECTION"`, `"CONFIGURATION"`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Whether a re-run could plausibly succeed. Configuration errors are
    /// never retryable.
    pub retryable: bool,
}
