use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Failed to load {location}: {reason}")]
    LoadFailure { location: String, reason: String },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Refusing to load index from unverified source: {0}")]
    TrustedSourceRequired(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RagError {
    pub fn load_failure(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailure {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn trusted_source_required(msg: impl Into<String>) -> Self {
        Self::TrustedSourceRequired(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
