use async_trait::async_trait;
use log::{ debug, info, warn };

use crate::errors::{ VigilError, VigilResult };
use crate::implementations::chat_client::OpenAIChatClient;
use crate::implementations::config::{ ServiceConfig, ESCALATION_SYSTEM };
use crate::traits::chat_service::{ ChatPrompt, ChatService };
use crate::traits::escalator::Escalator;

/// Asks a retrieval-backed search model (Perplexity Sonar by default) to
/// clarify a requirement the conversation raised but did not settle.
pub struct SearchEscalator<C: ChatService = OpenAIChatClient> {
    chat: C,
    system_prompt: String,
}

impl<C: ChatService> SearchEscalator<C> {
    pub fn new(chat: C, config: &ServiceConfig) -> VigilResult<Self> {
        Ok(Self {
            chat,
            system_prompt: config.get_template(ESCALATION_SYSTEM)?,
        })
    }
}

/// Question text, prefixed by the conversation when there is one
pub fn build_question(requirement_text: &str, transcript: &str) -> String {
    if transcript.trim().is_empty() {
        requirement_text.to_string()
    } else {
        format!("Context: {}\n\nQuestion: {}", transcript, requirement_text)
    }
}

#[async_trait]
impl<C: ChatService> Escalator for SearchEscalator<C> {
    async fn escalate(&self, requirement_text: &str, transcript: &str) -> VigilResult<String> {
        info!(
            "Requesting clarification for: {}",
            requirement_text.chars().take(50).collect::<String>()
        );

        let prompt = ChatPrompt::new(
            self.system_prompt.clone(),
            build_question(requirement_text, transcript)
        );
        let answer = self.chat.complete(&prompt).await?;

        if answer.trim().is_empty() {
            warn!("{} returned an empty answer", self.chat.service_name());
            return Err(VigilError::malformed_response(self.chat.service_name(), "empty answer"));
        }

        debug!("Clarification length: {} characters", answer.len());
        Ok(answer.trim().to_string())
    }
}
