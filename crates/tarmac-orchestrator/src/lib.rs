pub mod error;
pub mod orchestrator;
pub mod phase;

pub use error::OrchestratorError;
pub use orchestrator::{Orchestrator, OrchestrationResult, ResumeState};
pub use phase::run_phase;
