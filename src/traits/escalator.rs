use async_trait::async_trait;

use crate::errors::VigilResult;

/// Produces a clarification for a requirement the transcript only touched on
#[async_trait]
pub trait Escalator: Send + Sync {
    /// An empty answer is an error, never a successful clarification.
    async fn escalate(&self, requirement_text: &str, transcript: &str) -> VigilResult<String>;
}
