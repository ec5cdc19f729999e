use async_trait::async_trait;

use crate::errors::VigilResult;
use crate::models::common::Verdict;

/// Judges a transcript against a batch of requirements
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Return exactly one verdict per requirement, in input order.
    ///
    /// Unusable answers for individual requirements become
    /// `Verdict::Unrelated`; a failed call fails the whole batch.
    async fn classify(&self, requirements: &[String], transcript: &str) -> VigilResult<Vec<Verdict>>;
}
