use thiserror::Error;

/// Custom error types for the Vigil system
#[derive(Debug, Error)]
pub enum VigilError {
    /// An external service could not be reached or refused the request
    /// (network, authentication, quota, non-success HTTP status).
    #[error("Upstream error from {service}{}: {message}", status_suffix(.status))]
    Upstream { service: String, status: Option<u16>, message: String },

    /// The service answered, but the answer could not be used.
    #[error("Malformed response from {service}: {message}")]
    MalformedResponse { service: String, message: String },

    /// A row read from the requirement store does not match the expected shape.
    #[error("Malformed requirement record: {0}")]
    MalformedRecord(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("System error: {0}")]
    SystemError(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl VigilError {
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        VigilError::Upstream {
            service: service.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn malformed_response(service: impl Into<String>, message: impl Into<String>) -> Self {
        VigilError::MalformedResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Severity used by the CLI when reporting the error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VigilError::Configuration(_) | VigilError::SystemError(_) => ErrorSeverity::Fatal,
            VigilError::InvalidInput(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Result type specific to Vigil operations
pub type VigilResult<T> = Result<T, VigilError>;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Fatal,
    Error,
    Warning,
    Info,
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
}

impl RecoverableError for VigilError {
    fn is_recoverable(&self) -> bool {
        match self {
            VigilError::Upstream { status, .. } => {
                // 429 and 5xx are transient; auth and request errors are not
                matches!(status, None | Some(429) | Some(500..=599))
            }
            VigilError::InvalidInput(_) => true,
            _ => false,
        }
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            VigilError::Upstream { service, status: Some(401 | 403), .. } =>
                Some(format!("Check the API key configured for {}", service)),
            VigilError::Upstream { service, .. } if self.is_recoverable() =>
                Some(format!("Retry the request once {} is reachable again", service)),
            VigilError::MalformedRecord(_) =>
                Some("Inspect the requirement table for rows with an unknown phase".to_string()),
            VigilError::Configuration(_) =>
                Some("Set the missing value in the config file or .env".to_string()),
            VigilError::InvalidInput(_) => Some("Correct the input and try again".to_string()),
            _ => None,
        }
    }
}
