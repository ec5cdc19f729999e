use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::errors::VigilError;

pub const OPENAI_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const PERPLEXITY_CHAT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_TABLE: &str = "compliance_requirements";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required API key: {0}")]
    MissingApiKey(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Prompt template not found: {0}")]
    MissingTemplate(String),
}

impl From<ConfigError> for VigilError {
    fn from(err: ConfigError) -> Self {
        VigilError::Configuration(err.to_string())
    }
}

/// Connection settings for one chat-completion service
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// API key; when absent the key is read from `api_key_env`
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Full chat-completions URL
    pub api_endpoint: Option<String>,

    pub model: Option<String>,

    /// Sampling temperature (0.0-2.0)
    pub temperature: Option<f32>,

    pub top_p: Option<f32>,

    /// Maximum tokens for the answer
    pub max_tokens: Option<usize>,
}

/// Connection settings for the Supabase requirement table
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Project URL, e.g. https://xyz.supabase.co
    pub url: Option<String>,

    pub url_env: Option<String>,

    /// Service-role key
    pub service_key: Option<String>,

    pub service_key_env: Option<String>,

    /// Requirement table name
    pub table: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    /// Model that classifies transcripts against requirements
    pub classifier: ApiConfig,

    /// Search service used to clarify ambiguous requirements
    pub search: ApiConfig,

    /// Model that extracts checklist steps from procedure text
    pub extractor: ApiConfig,

    pub store: StoreConfig,

    /// HTTP timeout for every outbound call; unset means no timeout
    pub request_timeout_secs: Option<u64>,

    /// Prompt template overrides, keyed by template name
    pub prompt_templates: HashMap<String, String>,
}

/// Everything a chat client needs, with secrets resolved
#[derive(Clone)]
pub struct ChatSettings {
    pub service: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_tokens: Option<usize>,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ChatSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSettings")
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Supabase settings with secrets resolved
#[derive(Clone)]
pub struct StoreSettings {
    pub url: String,
    pub service_key: String,
    pub table: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: ServiceConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Get an API key, checking the environment if it is not in the config
    fn resolve_api_key(api: &ApiConfig, default_env: &str) -> Result<String, ConfigError> {
        use log::debug;

        if let Some(api_key) = &api.api_key {
            debug!("Using API key from config");
            return Ok(api_key.clone());
        }

        let env_var = api.api_key_env.as_deref().unwrap_or(default_env);
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => {
                debug!("Using API key from {}", env_var);
                Ok(key)
            }
            _ => Err(ConfigError::MissingApiKey(env_var.to_string())),
        }
    }

    fn chat_settings(
        &self,
        service: &str,
        api: &ApiConfig,
        defaults: &ApiConfig
    ) -> Result<ChatSettings, ConfigError> {
        let env_default = defaults.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
        let api_key = Self::resolve_api_key(api, env_default)?;

        Ok(ChatSettings {
            service: service.to_string(),
            endpoint: api.api_endpoint
                .clone()
                .or_else(|| defaults.api_endpoint.clone())
                .unwrap_or_else(|| OPENAI_CHAT_ENDPOINT.to_string()),
            model: api.model
                .clone()
                .or_else(|| defaults.model.clone())
                .unwrap_or_else(|| "gpt-4o".to_string()),
            api_key,
            temperature: api.temperature.or(defaults.temperature).unwrap_or(0.1),
            top_p: api.top_p.or(defaults.top_p),
            max_tokens: api.max_tokens.or(defaults.max_tokens),
            timeout: self.timeout(),
        })
    }

    pub fn classifier_settings(&self) -> Result<ChatSettings, ConfigError> {
        self.chat_settings("classifier", &self.classifier, &default_classifier_api())
    }

    pub fn search_settings(&self) -> Result<ChatSettings, ConfigError> {
        self.chat_settings("search", &self.search, &default_search_api())
    }

    pub fn extractor_settings(&self) -> Result<ChatSettings, ConfigError> {
        self.chat_settings("extractor", &self.extractor, &default_extractor_api())
    }

    pub fn store_settings(&self) -> Result<StoreSettings, ConfigError> {
        let url = match &self.store.url {
            Some(url) => url.clone(),
            None => {
                let env_var = self.store.url_env.as_deref().unwrap_or("SUPABASE_URL");
                std::env::var(env_var).map_err(|_| ConfigError::EnvVarNotFound(env_var.to_string()))?
            }
        };

        let service_key = match &self.store.service_key {
            Some(key) => key.clone(),
            None => {
                let env_var = self.store.service_key_env.as_deref().unwrap_or("SUPABASE_SERVICE_KEY");
                std::env::var(env_var).map_err(|_| ConfigError::MissingApiKey(env_var.to_string()))?
            }
        };

        Ok(StoreSettings {
            url: url.trim_end_matches('/').to_string(),
            service_key,
            table: self.store.table.clone().unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            timeout: self.timeout(),
        })
    }

    /// Get the template for a specific task, falling back to the built-in one
    pub fn get_template(&self, template_name: &str) -> Result<String, ConfigError> {
        self.prompt_templates
            .get(template_name)
            .cloned()
            .or_else(|| default_templates().remove(template_name))
            .ok_or_else(|| ConfigError::MissingTemplate(template_name.to_string()))
    }
}

/// Render a template, replacing every `{{key}}` with its value
pub fn render_template(template: &str, params: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

fn default_classifier_api() -> ApiConfig {
    ApiConfig {
        api_key: None,
        api_key_env: Some("OPENAI_API_KEY".to_string()),
        api_endpoint: Some(OPENAI_CHAT_ENDPOINT.to_string()),
        model: Some("gpt-4o".to_string()),
        temperature: Some(0.1),
        top_p: None,
        max_tokens: None,
    }
}

fn default_search_api() -> ApiConfig {
    ApiConfig {
        api_key: None,
        api_key_env: Some("PERPLEXITY_API_KEY".to_string()),
        api_endpoint: Some(PERPLEXITY_CHAT_ENDPOINT.to_string()),
        model: Some("sonar".to_string()),
        temperature: Some(0.2),
        top_p: Some(0.9),
        max_tokens: None,
    }
}

fn default_extractor_api() -> ApiConfig {
    ApiConfig {
        max_tokens: Some(4096),
        ..default_classifier_api()
    }
}

pub const CLASSIFICATION_SYSTEM: &str = "classification_system";
pub const CLASSIFICATION_REQUEST: &str = "classification_request";
pub const ESCALATION_SYSTEM: &str = "escalation_system";
pub const EXTRACTION_SYSTEM: &str = "extraction_system";
pub const EXTRACTION_REQUEST: &str = "extraction_request";

fn default_templates() -> HashMap<String, String> {
    let mut templates = HashMap::new();

    templates.insert(
        CLASSIFICATION_SYSTEM.to_string(),
        r#"You are an AI assistant specifically designed to monitor surgical room compliance by analyzing conversation context.

Your ONLY role is to determine if a given compliance requirement (presented as a question) is satisfied by the conversation context.
You must ONLY respond with one of these three letters:

A - The conversation context DIRECTLY satisfies the compliance requirement
B - The conversation context contains a question ABOUT this compliance requirement but doesn't satisfy it
C - The conversation context is unrelated to this compliance requirement

Examples:
1. Requirement: "Has the patient stated their name?"
   Context: "My name is Henry Jones."
   Response: "A" (requirement satisfied)

2. Requirement: "Has the patient stated their name?"
   Context: "Doctor: Could you please state your name?"
   Response: "B" (asking about requirement but not satisfied)

3. Requirement: "Has the patient stated their name?"
   Context: "The surgery will take approximately two hours."
   Response: "C" (unrelated to requirement)

Rules:
1. ONLY return A, B, or C - no other characters or explanations
2. If in doubt between options, choose the more cautious response
3. Context must EXPLICITLY satisfy requirements for an 'A' response
4. Partial satisfaction of a requirement should be marked as 'B'
5. Any ambiguity should be marked as 'B'
6. Never answer 'A' by default"#.to_string(),
    );

    templates.insert(
        CLASSIFICATION_REQUEST.to_string(),
        r#"Conversation Context:
{{transcript}}

Please evaluate each of the following compliance requirements.
For each requirement, respond with ONLY A, B, or C according to the rules.
Format your response as a list, one letter per line, in order.

Compliance Requirements:
{{requirements}}

Remember: Respond ONLY with A, B, or C for each requirement, one per line."#.to_string(),
    );

    templates.insert(
        ESCALATION_SYSTEM.to_string(),
        "You are a helpful AI assistant. Provide accurate, concise answers, while also maintaining that your output should resemble that of a conversational answer to the asker rather than a written researched response.".to_string(),
    );

    templates.insert(
        EXTRACTION_SYSTEM.to_string(),
        r#"You are an AI assistant specialized in analyzing surgical procedures and extracting ordered steps by phase.
Your primary responsibilities are:
1. Extract clear, sequential steps from surgical procedure descriptions
2. Categorize steps into appropriate phases: 'pre-op', 'intra-op', or 'post-op'
3. Maintain the exact order of steps within each phase
4. Ensure each step is clear, concise, and actionable
5. Include critical safety checks and verifications

Output format should be steps grouped by phase, where each step follows this pattern:
pre-op:
1. [Step description]
2. [Step description]

intra-op:
1. [Step description]
2. [Step description]

post-op:
1. [Step description]
2. [Step description]

Remember:
- Order within each phase is critically important
- Each step must be clear and specific
- Include safety checks where appropriate
- Maintain medical terminology accuracy"#.to_string(),
    );

    templates.insert(
        EXTRACTION_REQUEST.to_string(),
        "Extract the ordered steps by phase from this surgical procedure:\n\n{{procedure}}".to_string(),
    );

    templates
}

/// Default configuration
impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            classifier: default_classifier_api(),
            search: default_search_api(),
            extractor: default_extractor_api(),
            store: StoreConfig {
                url: None,
                url_env: Some("SUPABASE_URL".to_string()),
                service_key: None,
                service_key_env: Some("SUPABASE_SERVICE_KEY".to_string()),
                table: Some(DEFAULT_TABLE.to_string()),
            },
            request_timeout_secs: None,
            prompt_templates: HashMap::new(),
        }
    }
}
