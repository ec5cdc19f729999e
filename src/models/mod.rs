pub mod common;
pub mod requirement;
pub mod outcome;

// Re-export common model types
pub use common::{Phase, PipelineStage, Verdict};
pub use requirement::{NewRequirement, Requirement};
pub use outcome::{ClassificationResult, ComplianceOutcome, ComplianceRun, Escalation};
