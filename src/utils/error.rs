use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrystallineError {
    /// A ZF axiom rejected the input (Extensionality, Regularity, ...).
    #[error("Axiomatic violation ({axiom}): {message}")]
    AxiomaticViolation { axiom: String, message: String },

    /// The action collides with a registered deontic norm.
    #[error("Deontic conflict: {message}")]
    DeonticConflict { message: String },

    /// A specification could not be applied consistently.
    #[error("Logical inconsistency: {message}")]
    LogicalInconsistency { message: String },

    #[error("Validation error on '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Cryptographic failure: {message}")]
    CryptoError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Policy,
    Input,
    Configuration,
    Crypto,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status reported by the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl CrystallineError {
    pub fn axiom(axiom: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AxiomaticViolation {
            axiom: axiom.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn crypto(message: impl Into<String>) -> Self {
        Self::CryptoError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AxiomaticViolation { .. }
            | Self::DeonticConflict { .. }
            | Self::LogicalInconsistency { .. } => ErrorCategory::Policy,
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. } | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::CryptoError { .. } => ErrorCategory::Crypto,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Policy => ErrorSeverity::High,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Crypto => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::AxiomaticViolation { .. } => {
                "Inspect the payload or transition for self references, replays or empty sets"
            }
            Self::DeonticConflict { .. } => "Review the norms registered in the policy file",
            Self::LogicalInconsistency { .. } => {
                "Check for duplicate partitions or contradictory predicates"
            }
            Self::ValidationError { .. } => "Correct the highlighted field and retry",
            Self::ConfigError { .. } | Self::TomlError(_) => {
                "Verify the policy TOML file against the documented sections"
            }
            Self::CryptoError { .. } => {
                "Make sure the recipient proof matches the one used for sealing"
            }
            Self::IoError(_) => "Check that the file exists and the path is writable",
            Self::SerializationError(_) => "Ensure the input is a JSON array of audit requests",
            Self::CsvError(_) => "Check the output directory and retry the audit",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Policy => format!("Request rejected by policy: {}", self),
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Crypto => format!("Sealing failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrystallineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_errors_are_high_severity() {
        let err = CrystallineError::axiom("regularity", "node is its own parent");
        assert_eq!(err.category(), ErrorCategory::Policy);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("regularity"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: CrystallineError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("System error"));
    }

    #[test]
    fn test_every_severity_exits_non_zero() {
        assert_eq!(CrystallineError::crypto("tag mismatch").severity().exit_code(), 2);
        assert_eq!(CrystallineError::validation("label", "empty").severity().exit_code(), 1);
        assert_eq!(CrystallineError::config("missing").severity().exit_code(), 1);
        let io: CrystallineError = std::io::Error::other("disk").into();
        assert_eq!(io.severity().exit_code(), 3);
    }
}
