//! The seven domain analyzers (§2, Glossary). Each shares the same shape
//! — batched operational reads, one model call, a structured recommendation
//! — so they are all instances of `DomainAnalyzer`, configured per agent.

mod cargo;
mod crew_compliance;
mod finance;
mod guest_experience;
mod keys;
mod maintenance;
mod network;
mod regulatory;
mod template;

pub use cargo::cargo_analyzer;
pub use crew_compliance::crew_compliance_analyzer;
pub use finance::finance_analyzer;
pub use guest_experience::guest_experience_analyzer;
pub use maintenance::maintenance_analyzer;
pub use network::network_analyzer;
pub use regulatory::regulatory_analyzer;
pub use template::DomainAnalyzer;
