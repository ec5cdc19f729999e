use std::collections::HashMap;
use async_trait::async_trait;
use log::{ debug, info };

use crate::errors::VigilResult;
use crate::implementations::chat_client::OpenAIChatClient;
use crate::implementations::config::{
    render_template,
    ServiceConfig,
    EXTRACTION_REQUEST,
    EXTRACTION_SYSTEM,
};
use crate::models::common::Phase;
use crate::models::requirement::NewRequirement;
use crate::traits::chat_service::{ ChatPrompt, ChatService };
use crate::traits::procedure_extractor::ProcedureExtractor;

/// Extracts phase-grouped checklist steps from a procedure description
pub struct LLMProcedureExtractor<C: ChatService = OpenAIChatClient> {
    chat: C,
    system_prompt: String,
    request_template: String,
}

impl<C: ChatService> LLMProcedureExtractor<C> {
    pub fn new(chat: C, config: &ServiceConfig) -> VigilResult<Self> {
        Ok(Self {
            chat,
            system_prompt: config.get_template(EXTRACTION_SYSTEM)?,
            request_template: config.get_template(EXTRACTION_REQUEST)?,
        })
    }
}

/// Parse a phase-grouped numbered list into checklist rows.
///
/// A line ending in ':' or starting with '#' is a phase header and resets
/// the order counter. Numbered lines ("3. Close cecal stump.") become steps
/// of the current phase, ordered from 1. Steps with no recognised phase
/// above them are dropped.
pub fn parse_steps(response: &str) -> Vec<NewRequirement> {
    let mut steps = Vec::new();
    let mut current_phase: Option<Phase> = None;
    let mut current_order = 0;

    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(description) = numbered_item(line) {
            if let Some(phase) = current_phase {
                current_order += 1;
                steps.push(NewRequirement::new(description, phase, current_order));
            }
            continue;
        }

        if line.starts_with('#') || line.ends_with(':') {
            let label = line.trim_start_matches('#').trim_end_matches(':');
            current_phase = Phase::from_label(label);
            current_order = 0;
            if current_phase.is_none() {
                debug!("Skipping steps under unrecognised header: {}", line);
            }
        }
    }

    steps
}

/// Text of a "12. text" list item, or None when the line is not one
fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let description = line[digits..].strip_prefix('.')?.trim();
    if description.is_empty() { None } else { Some(description) }
}

#[async_trait]
impl<C: ChatService> ProcedureExtractor for LLMProcedureExtractor<C> {
    async fn extract_steps(&self, procedure_text: &str) -> VigilResult<Vec<NewRequirement>> {
        info!("Extracting procedure steps");

        let mut params = HashMap::new();
        params.insert("procedure", procedure_text.to_string());
        let prompt = ChatPrompt::new(
            self.system_prompt.clone(),
            render_template(&self.request_template, &params)
        );

        let response = self.chat.complete(&prompt).await?;
        let steps = parse_steps(&response);
        info!("Parsed {} steps", steps.len());
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_phase_grouped_list() {
        let response = "pre-op:\n1. Verify patient identity.\n2. Administer anesthesia.\n\nIntra-op:\n1. Make McBurney incision.\n\n## Post-operative\n1. Verify instrument and sponge count.\n2. Apply sterile dressing.";
        let steps = parse_steps(response);

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0], NewRequirement::new("Verify patient identity.", Phase::PreOp, 1));
        assert_eq!(steps[1].order, 2);
        assert_eq!(steps[2], NewRequirement::new("Make McBurney incision.", Phase::IntraOp, 1));
        assert_eq!(steps[4], NewRequirement::new("Apply sterile dressing.", Phase::PostOp, 2));
    }

    #[test]
    fn skips_steps_without_a_known_phase() {
        let response = "1. Orphan step\nRecovery:\n1. Not a surgical phase\npre-op:\nNote without number\n1. Kept";
        let steps = parse_steps(response);

        assert_eq!(steps, vec![NewRequirement::new("Kept", Phase::PreOp, 1)]);
    }

    #[test]
    fn numbered_line_ending_in_colon_is_a_step() {
        let steps = parse_steps("post-op:\n1. Confirm the following:\n2. Document procedure details.");

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].text, "Confirm the following:");
        assert_eq!(steps[1].phase, Phase::PostOp);
    }

    #[test]
    fn numbered_item_requires_digits_and_period() {
        assert_eq!(numbered_item("10. Close layers"), Some("Close layers"));
        assert_eq!(numbered_item("Step 1. Close"), None);
        assert_eq!(numbered_item("3 Close"), None);
        assert_eq!(numbered_item("4."), None);
    }
}
