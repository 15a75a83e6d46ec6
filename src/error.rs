use crate::detection::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed scenario: {0}")]
    MalformedScenario(#[from] ScenarioError),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by user input; the caller should re-prompt.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::MalformedScenario(_) | Error::LimitExceeded(_)
        )
    }
}

/// Why a persisted scenario could not be turned into a system state.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, Error>;
