//! Shared domain types for the Tarmac disruption-recovery engine.
//!
//! This crate owns every data-model entity in the specification (§3) plus
//! the validation and error types the rest of the workspace builds on. It
//! has no knowledge of orchestration, arbitration logic, or storage
//! backends — those live in their own crates and depend on this one.

pub mod agent;
pub mod analyzer;
pub mod arbitration;
pub mod checkpoint;
pub mod conflict;
pub mod decision;
pub mod disruption;
pub mod error;
pub mod plan;
pub mod solution;

pub use agent::{AgentName, AgentTier, ModelTier};
pub use analyzer::{AnalyzerPhase, AnalyzerResponse, AnalyzerStatus, Collation};
pub use arbitration::{AgentEvolution, AgentEvolutionKind, ArbitratorOutput, RecommendationEvolution};
pub use checkpoint::{CheckpointRecord, CheckpointState, DEFAULT_TTL_SECONDS, INLINE_PAYLOAD_CAP_BYTES};
pub use conflict::{ConflictDetail, ConflictType, ResolutionDetail, SafetyOverride};
pub use decision::{DecisionOutcome, DecisionRecord};
pub use disruption::DisruptionInput;
pub use error::{TarmacError, ValidationViolation};
pub use plan::{RecoveryPlan, RecoveryStep};
pub use solution::{composite_score, RecoverySolution};
