use async_trait::async_trait;

use crate::errors::VigilResult;

/// A single system + user exchange sent to a chat-completion model.
///
/// Sampling fields left as `None` fall back to the service's configured values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: None,
            top_p: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Chat-completion backend shared by the classifier, escalator and extractor
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Name used when attributing errors and log lines
    fn service_name(&self) -> &str;

    /// Send the prompt and return the content of the first choice.
    ///
    /// Transport, HTTP and decoding failures are returned as errors; there
    /// is no retry.
    async fn complete(&self, prompt: &ChatPrompt) -> VigilResult<String>;
}
