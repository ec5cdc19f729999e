use std::collections::HashMap;
use async_trait::async_trait;
use log::{ debug, info, warn };

use crate::errors::VigilResult;
use crate::implementations::chat_client::OpenAIChatClient;
use crate::implementations::config::{
    render_template,
    ServiceConfig,
    CLASSIFICATION_REQUEST,
    CLASSIFICATION_SYSTEM,
};
use crate::models::common::Verdict;
use crate::traits::chat_service::{ ChatPrompt, ChatService };
use crate::traits::classifier::Classifier;

/// Classifies a whole checklist against a transcript in one chat call.
///
/// The system prompt carries the decision policy (A only on explicit
/// satisfaction, B for anything partial or merely asked about, C when
/// unrelated, the cautious answer when in doubt). The user message numbers
/// the requirements and asks for one letter per line.
pub struct LLMClassifier<C: ChatService = OpenAIChatClient> {
    chat: C,
    system_prompt: String,
    request_template: String,
}

impl<C: ChatService> LLMClassifier<C> {
    pub fn new(chat: C, config: &ServiceConfig) -> VigilResult<Self> {
        Ok(Self {
            chat,
            system_prompt: config.get_template(CLASSIFICATION_SYSTEM)?,
            request_template: config.get_template(CLASSIFICATION_REQUEST)?,
        })
    }

    /// Build the user message for a batch of requirements
    pub fn build_request(&self, requirements: &[String], transcript: &str) -> String {
        let numbered = requirements
            .iter()
            .enumerate()
            .map(|(i, req)| format!("{}. {}", i + 1, req))
            .collect::<Vec<_>>()
            .join("\n");

        let mut params = HashMap::new();
        params.insert("transcript", transcript.to_string());
        params.insert("requirements", numbered);
        render_template(&self.request_template, &params)
    }
}

/// Pair response lines with requirement positions.
///
/// Always returns `count` verdicts. A missing line, or a line that is not
/// exactly one of the three symbols after trimming, yields `Unrelated`.
/// Lines beyond `count` are ignored.
pub fn parse_verdicts(response: &str, count: usize) -> Vec<Verdict> {
    let mut lines = response.trim().lines();

    (0..count)
        .map(|i| {
            match lines.next().map(str::trim) {
                Some(line) =>
                    Verdict::from_symbol(line).unwrap_or_else(|| {
                        warn!("Invalid response format for requirement {}, defaulting to 'C'", i + 1);
                        Verdict::Unrelated
                    }),
                None => {
                    warn!("No response line for requirement {}, defaulting to 'C'", i + 1);
                    Verdict::Unrelated
                }
            }
        })
        .collect()
}

#[async_trait]
impl<C: ChatService> Classifier for LLMClassifier<C> {
    async fn classify(&self, requirements: &[String], transcript: &str) -> VigilResult<Vec<Verdict>> {
        if requirements.is_empty() {
            debug!("No requirements to classify");
            return Ok(Vec::new());
        }

        info!("Starting batch compliance check");
        info!("Processing {} requirements", requirements.len());
        debug!("Context length: {} characters", transcript.len());

        let prompt = ChatPrompt::new(
            self.system_prompt.clone(),
            self.build_request(requirements, transcript)
        );

        let response = self.chat.complete(&prompt).await?;
        debug!("Received {} response lines", response.trim().lines().count());

        Ok(parse_verdicts(&response, requirements.len()))
    }
}
