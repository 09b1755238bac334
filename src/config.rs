//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};
use crate::pipeline::types::Language;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Local Vite dev and preview servers.
const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:4173"];

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body size.
    pub max_upload_bytes: usize,
    /// Allowed CORS origins. A single `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Full service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub llm: LlmConfig,
    pub language: Language,
    pub server: ServerConfig,
}

impl ServiceConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("EMAIL_CLASSIFIER_LLM_BACKEND") {
            Some(value) => value.parse::<LlmBackend>()?,
            None => LlmBackend::Anthropic,
        };

        let api_key = lookup(backend.api_key_var())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(backend.api_key_var().to_string()))?;

        let model = lookup("EMAIL_CLASSIFIER_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| backend.default_model().to_string());

        let language = match lookup("EMAIL_CLASSIFIER_LANGUAGE") {
            Some(value) => value.parse::<Language>()?,
            None => Language::default(),
        };

        let timeout_secs: u64 = lookup("EMAIL_CLASSIFIER_LLM_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS);

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            host: lookup("EMAIL_CLASSIFIER_HOST").unwrap_or(defaults.host),
            port: lookup("EMAIL_CLASSIFIER_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            max_upload_bytes: lookup("EMAIL_CLASSIFIER_MAX_UPLOAD_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            cors_origins: lookup("EMAIL_CLASSIFIER_CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
        };

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: secrecy::SecretString::from(api_key),
                model,
                timeout: Duration::from_secs(timeout_secs),
            },
            language,
            server,
        })
    }
}
