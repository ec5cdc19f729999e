use async_trait::async_trait;

use crate::errors::VigilResult;
use crate::models::common::Phase;
use crate::models::requirement::{ NewRequirement, Requirement };

/// Supplies the checklist the pipeline evaluates
#[async_trait]
pub trait RequirementSource: Send + Sync {
    /// All requirements, sorted by (phase, order)
    async fn fetch_requirements(&self) -> VigilResult<Vec<Requirement>>;

    /// Requirements of one phase, sorted by order
    async fn fetch_requirements_by_phase(&self, phase: Phase) -> VigilResult<Vec<Requirement>>;

    /// First requirement whose text equals `text` exactly
    async fn find_requirement(&self, text: &str) -> VigilResult<Option<Requirement>>;
}

/// Persists satisfied requirements
#[async_trait]
pub trait StatusWriter: Send + Sync {
    /// Set `completion_status` to true on rows whose text equals
    /// `requirement_text`.
    ///
    /// Returns `Ok(false)` when no row matched. Marking an already
    /// satisfied requirement again returns `Ok(true)`.
    async fn mark_satisfied(&self, requirement_text: &str) -> VigilResult<bool>;
}

/// Full requirement table access
#[async_trait]
pub trait RequirementStore: RequirementSource + StatusWriter {
    /// Insert new rows and return them as stored
    async fn insert_requirements(
        &self,
        requirements: &[NewRequirement]
    ) -> VigilResult<Vec<Requirement>>;
}
