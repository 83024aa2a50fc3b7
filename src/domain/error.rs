use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Duplicate learning model name: '{name}' is already registered")]
    DuplicateModelName { name: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn duplicate_model_name(name: impl Into<String>) -> Self {
        Self::DuplicateModelName { name: name.into() }
    }

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

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("model is missing a name");
        assert_eq!(
            error.to_string(),
            "Configuration error: model is missing a name"
        );
    }

    #[test]
    fn test_duplicate_model_name_error() {
        let error = DomainError::duplicate_model_name("sentiment");
        assert_eq!(
            error.to_string(),
            "Duplicate learning model name: 'sentiment' is already registered"
        );
    }

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("learning model 'missing' is not registered");
        assert_eq!(
            error.to_string(),
            "Not found: learning model 'missing' is not registered"
        );
    }
}
