//! The seven domain analyzers (§4.2) and the registry the orchestrator
//! fans out to.

pub mod contract;
pub mod domains;
pub mod registry;

pub use contract::{build_envelope, Analyzer, AnalyzerInput, PriorPhaseContext};
pub use domains::{
    cargo_analyzer, crew_compliance_analyzer, finance_analyzer, guest_experience_analyzer, maintenance_analyzer,
    network_analyzer, regulatory_analyzer, DomainAnalyzer,
};
pub use registry::AnalyzerRegistry;
