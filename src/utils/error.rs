use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalentError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("LLM error: {message}")]
    LlmError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Llm,
    Request,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TalentError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        TalentError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        TalentError::LlmError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TalentError::HttpError(_) => ErrorCategory::Network,
            TalentError::IoError(_) => ErrorCategory::System,
            TalentError::SerializationError(_) | TalentError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            TalentError::ConfigError { .. }
            | TalentError::ConfigValidationError { .. }
            | TalentError::InvalidConfigValueError { .. }
            | TalentError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TalentError::NotFound { .. } | TalentError::ValidationError { .. } => {
                ErrorCategory::Request
            }
            TalentError::LlmError { .. } => ErrorCategory::Llm,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TalentError::NotFound { .. } | TalentError::ValidationError { .. } => {
                ErrorSeverity::Low
            }
            TalentError::HttpError(_) | TalentError::LlmError { .. } => ErrorSeverity::Medium,
            TalentError::SerializationError(_) | TalentError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            TalentError::IoError(_)
            | TalentError::ConfigError { .. }
            | TalentError::ConfigValidationError { .. }
            | TalentError::InvalidConfigValueError { .. }
            | TalentError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Short message suitable for end users and HTTP clients.
    pub fn user_friendly_message(&self) -> String {
        match self {
            TalentError::HttpError(_) => "Could not reach an upstream service".to_string(),
            TalentError::IoError(e) => format!("File system error: {}", e),
            TalentError::SerializationError(_) => "Received malformed data".to_string(),
            TalentError::ConfigError { message } => format!("Configuration problem: {}", message),
            TalentError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            TalentError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            TalentError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            TalentError::NotFound { entity, .. } => format!("{} not found", entity),
            TalentError::LlmError { .. } => "The language model is unavailable".to_string(),
            TalentError::ValidationError { message } => message.clone(),
            TalentError::ProcessingError { .. } => "Failed to process query".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the upstream service URL",
            ErrorCategory::Configuration => "Review the TOML configuration and command-line flags",
            ErrorCategory::Data => "Verify the dataset file and the shape of upstream responses",
            ErrorCategory::Llm => "Make sure Ollama is running and the configured model is pulled",
            ErrorCategory::Request => "Check the identifiers and fields in the request",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, TalentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_low_severity_request_error() {
        let err = TalentError::not_found("Employee", "EMP999");
        assert_eq!(err.category(), ErrorCategory::Request);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.to_string(), "Employee not found: EMP999");
        assert_eq!(err.user_friendly_message(), "Employee not found");
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = TalentError::MissingConfigError {
            field: "llm.model".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_llm_error_suggestion_mentions_ollama() {
        let err = TalentError::llm("connection refused");
        assert!(err.recovery_suggestion().contains("Ollama"));
    }
}
