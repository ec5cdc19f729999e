use std::path::Path;
use serde::Serialize;

use crate::implementations::config::{ ConfigError, ServiceConfig };

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<OutputFormat> {
        match value.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Options for the main Vigil system
pub struct VigilOptions {
    pub services: ServiceConfig,
    pub output_format: OutputFormat,
}

impl VigilOptions {
    /// Read the service config from `path`, or use defaults when no file is given
    pub fn load(path: Option<&Path>, output_format: OutputFormat) -> Result<Self, ConfigError> {
        let services = match path {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        Ok(Self {
            services,
            output_format,
        })
    }
}
