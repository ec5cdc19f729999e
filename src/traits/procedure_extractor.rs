use async_trait::async_trait;

use crate::errors::VigilResult;
use crate::models::requirement::NewRequirement;

/// Turns a free-text surgical procedure into phase-ordered checklist rows
#[async_trait]
pub trait ProcedureExtractor: Send + Sync {
    async fn extract_steps(&self, procedure_text: &str) -> VigilResult<Vec<NewRequirement>>;
}
