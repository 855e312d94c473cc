//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                    crate::exitcode::NOINPUT
                }
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_)
                    | ApplicationError::Parse { .. }
                    | ApplicationError::UnsupportedFormat(_)
                    | ApplicationError::Resolution { .. } => crate::exitcode::DATAERR,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }

    /// Critical diagnostics carried by a failed resolution, if any.
    pub fn diagnostics(&self) -> &[String] {
        match self {
            CliError::Infra(InfraError::Application(ApplicationError::Resolution {
                diagnostics,
                ..
            })) => diagnostics,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follows_sysexits() {
        let resolution: CliError = ApplicationError::Resolution {
            path: PathBuf::from("a.yml"),
            diagnostics: vec!["x: y: cannot inherit from itself".into()],
        }
        .into();
        let missing: CliError = InfraError::io(
            "open a.yml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .into();
        let config: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();

        assert_eq!(resolution.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(resolution.diagnostics().len(), 1);
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);
        assert_eq!(CliError::Usage("u".into()).exit_code(), crate::exitcode::USAGE);
    }
}
