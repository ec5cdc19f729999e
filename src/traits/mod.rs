pub mod chat_service;
pub mod requirement_store;
pub mod classifier;
pub mod escalator;
pub mod procedure_extractor;
pub mod compliance_system;

// Re-export traits
pub use chat_service::{ChatPrompt, ChatService};
pub use requirement_store::{RequirementSource, RequirementStore, StatusWriter};
pub use classifier::Classifier;
pub use escalator::Escalator;
pub use procedure_extractor::ProcedureExtractor;
pub use compliance_system::ComplianceSystem;
