//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, invalid config, not signed in)
//! - 4: Operation failed (task store, I/O)

use thiserror::Error;

use crate::dashboard::DashboardError;
use crate::repository::RepositoryError;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not signed in: run `taskflow login` first")]
    NotSignedIn,

    // Operation failures (exit code 4)
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) | Error::InvalidArgument(_) | Error::NotSignedIn => {
                exit_codes::USER_ERROR
            }
            Error::Dashboard(DashboardError::Validation(_)) => exit_codes::USER_ERROR,

            Error::Dashboard(_)
            | Error::Repository(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationErrors;

    #[test]
    fn exit_codes_by_class() {
        assert_eq!(Error::NotSignedIn.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(
            Error::InvalidConfig("x".into()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::from(DashboardError::Validation(ValidationErrors::default())).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::from(RepositoryError::Transport("down".into())).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }

    #[test]
    fn repository_errors_display_transparently() {
        let err = Error::from(RepositoryError::Rejected("HTTP 500".into()));
        assert_eq!(err.to_string(), "task store rejected the request: HTTP 500");
    }
}
