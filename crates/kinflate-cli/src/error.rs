//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use kinflate_core::CoreError;
use kinflate_engine::EngineError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Building the application failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] EngineError),

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kinflate::cli::io))]
    Io {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Build(err) => match err.root_cause() {
                EngineError::Core(
                    CoreError::ManifestNotFound { .. }
                    | CoreError::InvalidManifest { .. }
                    | CoreError::InvalidResource { .. }
                    | CoreError::YamlParse(_),
                ) => exit_codes::MANIFEST_ERROR,
                EngineError::Io(_) | EngineError::Core(CoreError::Io(_)) => exit_codes::IO_ERROR,
                _ => exit_codes::BUILD_ERROR,
            },
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create an IO error about a path
    pub fn io(err: std::io::Error, path: &std::path::Path) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), err),
            help: None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
            help: None,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Build(EngineError::Core(err))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let manifest: CliError = CoreError::ManifestNotFound {
            path: "x".to_string(),
        }
        .into();
        assert_eq!(manifest.exit_code(), exit_codes::MANIFEST_ERROR);

        let build = CliError::Build(EngineError::Generator {
            name: "cm".to_string(),
            message: "duplicate key 'a'".to_string(),
        });
        assert_eq!(build.exit_code(), exit_codes::BUILD_ERROR);

        let io: CliError = std::io::Error::other("denied").into();
        assert_eq!(io.exit_code(), exit_codes::IO_ERROR);
    }
}
