use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresubmitError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    PresubmitFailure { message: String },

    #[error("{line}:{col}: {message}")]
    LexError {
        message: String,
        line: usize,
        col: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Script,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PresubmitError {
    pub fn presubmit_failure(message: impl Into<String>) -> Self {
        PresubmitError::PresubmitFailure {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PresubmitError::IoError(_) | PresubmitError::WalkError(_) => ErrorCategory::FileSystem,
            PresubmitError::SerializationError(_) | PresubmitError::PresubmitFailure { .. } => {
                ErrorCategory::Script
            }
            PresubmitError::TomlError(_)
            | PresubmitError::ConfigValidationError { .. }
            | PresubmitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PresubmitError::LexError { .. } => ErrorCategory::Source,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PresubmitError::LexError { .. } => ErrorSeverity::Medium,
            PresubmitError::PresubmitFailure { .. }
            | PresubmitError::TomlError(_)
            | PresubmitError::ConfigValidationError { .. }
            | PresubmitError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            PresubmitError::IoError(_)
            | PresubmitError::WalkError(_)
            | PresubmitError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check presubmit.toml and the PRESUBMIT.toml scripts for typos and unsupported values"
            }
            ErrorCategory::FileSystem => {
                "Make sure the base directory exists and is readable"
            }
            ErrorCategory::Script => "Fix the presubmit script named in the message",
            ErrorCategory::Source => "Fix the source file so it tokenizes as Java",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PresubmitError::IoError(e) => format!("Could not read or write a file: {}", e),
            PresubmitError::WalkError(e) => format!("Could not list files: {}", e),
            PresubmitError::LexError { message, line, col } => {
                format!("Could not tokenize Java source at line {}, column {}: {}", line, col, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PresubmitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_is_a_script_error() {
        let err = PresubmitError::presubmit_failure("\"a/PRESUBMIT.toml\" has an exception.");
        assert_eq!(err.category(), ErrorCategory::Script);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.to_string(), "\"a/PRESUBMIT.toml\" has an exception.");
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: PresubmitError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("gone"));
    }
}
