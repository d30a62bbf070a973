use std::env;
use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub model_timeout_secs: u64,
    pub model_temperature: Option<f32>,
    pub model_thinking_budget: Option<u32>,
    pub quiz_language: String,
    pub chat_history_limit: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: SecretString::from(env::var("GEMINI_API_KEY").unwrap_or_default()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            model_timeout_secs: env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(120),
            model_temperature: env::var("MODEL_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok()),
            model_thinking_budget: env::var("MODEL_THINKING_BUDGET")
                .ok()
                .and_then(|b| b.parse().ok()),
            quiz_language: env::var("QUIZ_LANGUAGE").unwrap_or_else(|_| "Arabic".to_string()),
            chat_history_limit: env::var("CHAT_HISTORY_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or(20),
        }
    }

    /// Checks that the model credential is present before any call is attempted.
    pub fn validate(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        if self.gemini_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ConfigError(
                "GEMINI_API_KEY is not set. Export it or add it to .env".to_string(),
            ));
        }

        if self.model_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "MODEL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gemini_api_key: SecretString::from("test-key".to_string()),
            gemini_model: "gemini-test".to_string(),
            gemini_base_url: "http://127.0.0.1:9/v1beta/models".to_string(),
            model_timeout_secs: 5,
            model_temperature: Some(0.2),
            model_thinking_budget: None,
            quiz_language: "English".to_string(),
            chat_history_limit: 4,
        }
    }
}
