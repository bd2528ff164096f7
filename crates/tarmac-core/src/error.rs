//! Error kinds per spec §7.
//!
//! Analyzer failures, checkpoint write failures, and arbitrator validation
//! errors are absorbed at their own layer (they never reach this enum);
//! `TarmacError` is reserved for the outcomes that do propagate to a caller
//! of the orchestrator or the decision-record sink.

use thiserror::Error;

/// Top-level error kinds returned by the orchestrator, arbitrator, and
/// decision-record sink.
#[derive(Debug, Error)]
pub enum TarmacError {
    /// Input validation failed (length, shape, missing fields).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The referenced disruption, thread, or checkpoint is unknown.
    #[error("not found: {0}")]
    NotFound(String),

    /// The end-to-end soft budget was exhausted.
    #[error("timeout after {elapsed_seconds:.1}s")]
    Timeout { elapsed_seconds: f64 },

    /// All safety analyzers failed across both phases.
    #[error("all safety analyzers unavailable for thread {thread}")]
    Unavailable { thread: uuid::Uuid },

    /// An unexpected failure, always logged with context before returning.
    #[error("internal error: {0}")]
    Internal(String),

    /// A decision record was written to some but not all destinations.
    #[error("partial success: {succeeded:?} succeeded, {failed:?} failed")]
    PartialSuccess {
        succeeded: Vec<String>,
        failed: Vec<String>,
    },
}

/// One field-level violation discovered by an entity's `validate()`.
///
/// Unlike `TarmacError`, a `ValidationViolation` is not necessarily fatal —
/// the arbitrator's scoring pipeline (§4.3) uses these to decide whether a
/// generated `RecoverySolution` survives into the final output, rather than
/// panicking or returning early on the first violation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// Dotted path to the offending field, e.g. `"recovery_plan.steps[2].dependencies"`.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
