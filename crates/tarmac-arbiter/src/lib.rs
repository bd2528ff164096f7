//! Arbitration engine (§4.3): conflict detection, binding-constraint
//! enforcement, scored recovery-plan generation, Pareto filtering, and
//! ranking. Consumes one or two `Collation`s (phase 1 optional) and
//! produces the final `ArbitratorOutput`.

pub mod arbiter;
pub mod audit;
pub mod conflicts;
pub mod constraints;
pub mod error;
pub mod evolution;
pub mod facts;
pub mod plan;
pub mod scoring;

pub use arbiter::Arbitrator;
pub use audit::{ArbitrationAuditEntry, ArbitrationAuditLog};
pub use constraints::ConstraintDelta;
pub use error::ArbiterError;
pub use facts::{arbitration_schema, ArbitrationModelOutput, CandidateFacts, ConflictFacts, SafetyOverrideFacts, StepFacts};
