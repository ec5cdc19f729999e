pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{OutputFormat, VigilOptions};
pub use errors::{ErrorSeverity, RecoverableError, VigilError, VigilResult};
pub use implementations::{build_live_system, LiveComplianceSystem};
pub use implementations::config::{ConfigError, ServiceConfig};
pub use implementations::pipeline::CompliancePipeline;
pub use models::{
    common::{
        Phase,
        PipelineStage,
        Verdict,
    },
    requirement::{
        NewRequirement,
        Requirement,
    },
    outcome::{
        ClassificationResult,
        ComplianceOutcome,
        ComplianceRun,
        Escalation,
    },
};
pub use traits::{
    ChatPrompt,
    ChatService,
    Classifier,
    ComplianceSystem,
    Escalator,
    ProcedureExtractor,
    RequirementSource,
    RequirementStore,
    StatusWriter,
};
