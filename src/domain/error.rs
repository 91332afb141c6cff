use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error originates from the cache layer.
    ///
    /// Cache failures are absorbed at the cache service boundary and must
    /// never fail a query.
    pub fn is_cache(&self) -> bool {
        matches!(self, Self::Cache { .. })
    }
}
