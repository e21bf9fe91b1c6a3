use thiserror::Error;

/// Failure taxonomy shared by the two services. Validation failures are
/// raised before any provider call; provider failures are wrapped here and
/// never escape as raw errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to generate meal plan")]
    GenerationFailed(anyhow::Error),
    #[error("Failed to translate")]
    TranslationFailed(anyhow::Error),
}

impl ServiceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ServiceError::InvalidInput(_))
    }
}
