use thiserror::Error;

use crate::constants::prompts::GENERATION_FAILED_ALERT;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Request in flight: {0}")]
    RequestInFlight(String),

    #[error("Question generation failed: {0}")]
    GenerationFailed(String),

    #[error("Model service error: {0}")]
    ModelServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::RequestInFlight(_) => "REQUEST_IN_FLIGHT",
            AppError::GenerationFailed(_) => "GENERATION_FAILED",
            AppError::ModelServiceError(_) => "MODEL_SERVICE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Text a view shows to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            AppError::GenerationFailed(_) | AppError::ModelServiceError(_) => {
                GENERATION_FAILED_ALERT.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Failures of a single call to the hosted model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Missing model API credential")]
    MissingCredential,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed model output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Model output rejected: {0}")]
    Rejected(String),
}

impl From<validator::ValidationErrors> for ModelError {
    fn from(err: validator::ValidationErrors) -> Self {
        ModelError::Rejected(err.to_string())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MissingCredential => AppError::ConfigError(err.to_string()),
            other => AppError::ModelServiceError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type ModelResult<T> = Result<T, ModelError>;
