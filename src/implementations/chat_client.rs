use async_trait::async_trait;
use log::{ debug, info, warn };
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::errors::{ VigilError, VigilResult };
use crate::implementations::config::ChatSettings;
use crate::traits::chat_service::{ ChatPrompt, ChatService };

/// Transport-level failures of a chat-completions call
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API error: {0}")] ApiError(String),

    #[error("Failed to parse API response: {0}")] ParseError(String),

    #[error("Network error: {0}")] NetworkError(String),

    #[error("HTTP error: {status} - {message}")] HttpError {
        status: u16,
        message: String,
    },
}

impl ServiceError {
    /// Convert into the crate error, naming the service that failed
    pub fn attribute(self, service: &str) -> VigilError {
        match self {
            ServiceError::ApiError(msg) => VigilError::upstream(service, msg),
            ServiceError::NetworkError(msg) => VigilError::upstream(service, msg),
            ServiceError::HttpError { status, message } =>
                VigilError::Upstream {
                    service: service.to_string(),
                    status: Some(status),
                    message,
                },
            ServiceError::ParseError(msg) => VigilError::malformed_response(service, msg),
        }
    }
}

/// OpenAI-compatible chat request and response types
#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatResponseChoice>,
}

/// Chat-completions client for OpenAI and OpenAI-compatible APIs
/// (Perplexity exposes the same request shape).
///
/// # API Keys
/// The key is resolved when the settings are built: either `api_key` in the
/// config file or the environment variable named by `api_key_env`
/// (`OPENAI_API_KEY` for the classifier, `PERPLEXITY_API_KEY` for search).
#[derive(Clone)]
pub struct OpenAIChatClient {
    settings: ChatSettings,
    http_client: reqwest::Client,
}

impl OpenAIChatClient {
    pub fn new(settings: ChatSettings) -> VigilResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| VigilError::SystemError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { settings, http_client })
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    fn build_request(&self, prompt: &ChatPrompt) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user.clone(),
                }
            ],
            temperature: prompt.temperature.unwrap_or(self.settings.temperature),
            top_p: prompt.top_p.or(self.settings.top_p),
            max_tokens: prompt.max_tokens.or(self.settings.max_tokens),
            stream: false,
        }
    }

    /// Call the chat API with the given prompt
    async fn call_chat_api(&self, prompt: &ChatPrompt) -> Result<String, ServiceError> {
        let request = self.build_request(prompt);

        info!("Making chat API request to {}", self.settings.service);
        debug!("API endpoint: {}", self.settings.endpoint);
        debug!("Model: {}", request.model);
        debug!("Temperature: {}", request.temperature);
        debug!("Prompt length: {} characters", prompt.user.len());

        let response = self.http_client
            .post(&self.settings.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send().await
            .map_err(|e| {
                let error_msg = format!("Network error when calling {}: {}", self.settings.service, e);
                warn!("{}", error_msg);
                if e.is_timeout() {
                    warn!("Request timed out");
                }
                if e.is_connect() {
                    warn!("Connection error - check network connectivity");
                }
                ServiceError::NetworkError(error_msg)
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());

            warn!("API error: HTTP {} - {}", status, error_text);
            return Err(ServiceError::HttpError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await.map_err(|e| {
            warn!("Failed to get text from response: {}", e);
            ServiceError::NetworkError(e.to_string())
        })?;

        debug!("Response length: {} characters", response_text.len());

        extract_content(&response_text)
    }
}

/// Pull the first choice's message content out of a chat-completions body
fn extract_content(body: &str) -> Result<String, ServiceError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        warn!("Failed to parse response: {}", e);
        ServiceError::ParseError(format!("Invalid JSON response: {}", e))
    })?;

    let choice = response.choices.into_iter().next().ok_or_else(|| {
        warn!("API returned empty choices array");
        ServiceError::ApiError("No response from API".to_string())
    })?;

    choice.message.content.ok_or_else(|| {
        ServiceError::ParseError("Missing content in first choice".to_string())
    })
}

#[async_trait]
impl ChatService for OpenAIChatClient {
    fn service_name(&self) -> &str {
        &self.settings.service
    }

    async fn complete(&self, prompt: &ChatPrompt) -> VigilResult<String> {
        let content = self
            .call_chat_api(prompt).await
            .map_err(|e| e.attribute(&self.settings.service))?;
        info!("{} call completed successfully", self.settings.service);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ChatSettings {
        ChatSettings {
            service: "search".to_string(),
            endpoint: "http://localhost/v1/chat/completions".to_string(),
            model: "sonar".to_string(),
            api_key: "secret".to_string(),
            temperature: 0.2,
            top_p: Some(0.9),
            max_tokens: None,
            timeout: None,
        }
    }

    #[test]
    fn request_falls_back_to_configured_sampling() {
        let client = OpenAIChatClient::new(settings()).unwrap();
        let prompt = ChatPrompt::new("system text", "user text");
        let body = serde_json::to_value(client.build_request(&prompt)).unwrap();

        assert_eq!(body["model"], "sonar");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user text");
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
        assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn prompt_sampling_overrides_settings() {
        let client = OpenAIChatClient::new(settings()).unwrap();
        let prompt = ChatPrompt::new("s", "u").with_temperature(0.0).with_max_tokens(16);
        let request = client.build_request(&prompt);

        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_tokens, Some(16));
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"A\nC"},"finish_reason":"stop"}]}"#;
        assert_eq!(extract_content(body).unwrap(), "A\nC");
    }

    #[test]
    fn empty_choices_is_an_error() {
        assert!(matches!(extract_content(r#"{"choices":[]}"#), Err(ServiceError::ApiError(_))));
        assert!(matches!(extract_content("not json"), Err(ServiceError::ParseError(_))));
    }

    #[test]
    fn http_errors_keep_status_when_attributed() {
        let err = ServiceError::HttpError { status: 429, message: "quota".to_string() }.attribute("classifier");
        match err {
            VigilError::Upstream { service, status, .. } => {
                assert_eq!(service, "classifier");
                assert_eq!(status, Some(429));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn debug_output_hides_api_key() {
        assert!(!format!("{:?}", settings()).contains("secret"));
    }
}
