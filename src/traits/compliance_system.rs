use async_trait::async_trait;

use crate::errors::VigilResult;
use crate::models::common::Phase;
use crate::models::outcome::ComplianceRun;
use crate::models::requirement::{ NewRequirement, Requirement };

/// Main facade for the Vigil system
#[async_trait]
pub trait ComplianceSystem: Send + Sync {
    /// Evaluate a conversation transcript against the stored checklist
    async fn process_transcript(&self, transcript: &str) -> VigilResult<ComplianceRun>;

    /// Manually mark one requirement as satisfied
    async fn mark_requirement(&self, requirement_text: &str) -> VigilResult<bool>;

    /// List the checklist, optionally restricted to one phase
    async fn list_requirements(&self, phase: Option<Phase>) -> VigilResult<Vec<Requirement>>;

    /// Extract checklist steps from a procedure description without storing them
    async fn extract_procedure(&self, procedure_text: &str) -> VigilResult<Vec<NewRequirement>>;

    /// Store previously extracted steps
    async fn store_requirements(&self, steps: &[NewRequirement]) -> VigilResult<Vec<Requirement>>;
}
