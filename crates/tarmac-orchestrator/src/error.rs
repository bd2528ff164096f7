use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Core(#[from] tarmac_core::TarmacError),

    #[error("checkpoint store error: {0}")]
    Checkpoint(#[from] tarmac_checkpoint::CheckpointError),

    #[error("arbitration failed: {0}")]
    Arbitration(#[from] tarmac_arbiter::ArbiterError),

    #[error("stored checkpoint state at {checkpoint_id} could not be deserialized: {detail}")]
    CorruptCheckpoint { checkpoint_id: String, detail: String },
}

impl From<OrchestratorError> for tarmac_core::TarmacError {
    /// Collapse the orchestrator's internal error surface down to the
    /// seven error kinds in §7. `TarmacError::InvalidRequest` /
    /// `TarmacError::Unavailable` pass through unchanged (the orchestrator
    /// raises those directly); everything else becomes `INTERNAL`.
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Core(e) => e,
            other => tarmac_core::TarmacError::Internal(other.to_string()),
        }
    }
}
