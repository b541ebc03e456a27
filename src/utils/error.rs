use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Build of '{unit}' failed with {}", exit_description(.code))]
    BuildFailed { unit: String, code: Option<i32> },

    #[error("Build of '{unit}' could not be started: {source}")]
    BuildSpawn {
        unit: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {}: {source}", .path.display())]
    ManifestFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Build,
    Manifest,
    Filesystem,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeployError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeployError::BuildFailed { .. } | DeployError::BuildSpawn { .. } => {
                ErrorCategory::Build
            }
            DeployError::ManifestFormat { .. } | DeployError::SerializationError(_) => {
                ErrorCategory::Manifest
            }
            DeployError::IoError(_) | DeployError::WalkError(_) => ErrorCategory::Filesystem,
            DeployError::ConfigValidationError { .. }
            | DeployError::InvalidConfigValueError { .. }
            | DeployError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Build | ErrorCategory::Manifest => ErrorSeverity::High,
            ErrorCategory::Filesystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DeployError::BuildFailed { unit, .. } => format!(
                "Run the build for '{}' on its own to see the full compiler output",
                unit
            ),
            DeployError::BuildSpawn { .. } => {
                "Check that the build tool is installed and on PATH".to_string()
            }
            DeployError::ManifestFormat { path, .. } => format!(
                "Rebuild the host so that {} is regenerated",
                path.display()
            ),
            DeployError::IoError(_) | DeployError::WalkError(_) => {
                "Check permissions and free space in the output directory".to_string()
            }
            DeployError::SerializationError(_) => {
                "Inspect the generated JSON files for unexpected content".to_string()
            }
            DeployError::ConfigValidationError { field, .. }
            | DeployError::InvalidConfigValueError { field, .. }
            | DeployError::MissingConfigError { field } => {
                format!("Fix '{}' in the deployment configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::BuildFailed { unit, .. } => {
                format!("Build failed for '{}', deployment aborted", unit)
            }
            DeployError::BuildSpawn { unit, .. } => {
                format!("Could not start the build for '{}'", unit)
            }
            DeployError::ManifestFormat { path, .. } => {
                format!("Manifest {} is not valid JSON", path.display())
            }
            other => other.to_string(),
        }
    }

    /// Process exit code for this error. A failed build propagates its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::BuildFailed { code: Some(code), .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_failure_propagates_exit_code() {
        let err = DeployError::BuildFailed {
            unit: "cart".to_string(),
            code: Some(42),
        };
        assert_eq!(err.exit_code(), 42);
        assert_eq!(err.category(), ErrorCategory::Build);
        assert!(err.to_string().contains("exit code 42"));
    }

    #[test]
    fn test_signal_terminated_build_exits_with_one() {
        let err = DeployError::BuildFailed {
            unit: "cart".to_string(),
            code: None,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_config_errors_are_medium_severity() {
        let err = DeployError::MissingConfigError {
            field: "units".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 1);
        assert!(err.recovery_suggestion().contains("units"));
    }
}
