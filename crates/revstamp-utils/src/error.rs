use std::io;
use thiserror::Error;

/// Library-level error type for revstamp operations.
///
/// `RevstampError` is the primary error type returned by revstamp library
/// operations. Errors are organized into categories:
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Run configuration file or CLI argument errors |
/// | `Source` | Failures reported by the status-record producer |
/// | `Records` | Malformed record stream input |
/// | `Io` | Underlying I/O failures |
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map errors to CLI exit
/// codes. Library code returns `RevstampError` and does NOT call
/// `std::process::exit()`.
#[derive(Error, Debug)]
pub enum RevstampError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Status source error: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid record stream {path}: {reason}")]
    Records { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl RevstampError {
    /// Map this error to the CLI exit code documented in
    /// [`exit_codes`](crate::exit_codes).
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;
        match self {
            Self::Config(_) | Self::Records { .. } => ExitCode::CLI_ARGS,
            Self::Source(_) => ExitCode::STATUS_FAILURE,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

/// Errors reported by the external status-record producer.
///
/// The producer owns all I/O against the working-copy store and the remote
/// repository; this enum is how its failures cross the seam. Two variants are
/// *degradable*: the entry is simply not under version control, which the
/// pipeline resolves locally by substituting the fixed unversioned summary.
/// Everything else is fatal by default and only downgraded when the run is
/// configured to keep going.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{path} is not a working copy")]
    NotWorkingCopy { path: String },

    #[error("working copy path {path} does not exist")]
    PathNotFound { path: String },

    #[error("permission denied while reading {path}")]
    PermissionDenied { path: String },

    #[error("working copy metadata for {path} is corrupt: {reason}")]
    CorruptWorkingCopy { path: String, reason: String },

    #[error("status backend failure: {reason}")]
    Backend { reason: String },
}

impl SourceError {
    /// Whether this failure is resolved locally by substituting the
    /// unversioned summary instead of propagating.
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::NotWorkingCopy { .. } | Self::PathNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;

    #[test]
    fn degradable_source_errors() {
        assert!(
            SourceError::NotWorkingCopy {
                path: "/tmp/x".to_string()
            }
            .is_degradable()
        );
        assert!(
            SourceError::PathNotFound {
                path: "/tmp/x".to_string()
            }
            .is_degradable()
        );
        assert!(
            !SourceError::Backend {
                reason: "connection refused".to_string()
            }
            .is_degradable()
        );
        assert!(
            !SourceError::PermissionDenied {
                path: "/tmp/x".to_string()
            }
            .is_degradable()
        );
    }

    #[test]
    fn exit_code_mapping() {
        let err = RevstampError::Config(ConfigError::InvalidValue {
            key: "depth".to_string(),
            value: "bogus".to_string(),
        });
        assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);

        let err = RevstampError::Source(SourceError::Backend {
            reason: "unreachable".to_string(),
        });
        assert_eq!(err.to_exit_code(), ExitCode::STATUS_FAILURE);
    }
}
