//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use kubechart_core::CoreError;
use kubechart_helm::HelmError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// The chart definition file could not be read or parsed
    #[error("Definition error: {message}")]
    #[diagnostic(code(kubechart::cli::definition))]
    Definition {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid chart descriptor or object
    #[error("Chart error: {message}")]
    #[diagnostic(code(kubechart::cli::chart))]
    Chart {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Kubernetes cluster unavailable\n{output}")]
    #[diagnostic(
        code(kubechart::cli::cluster_unavailable),
        help("check the current kubeconfig context and that the API server is reachable")
    )]
    ClusterUnavailable { output: String },

    #[error("Release name is already in use\n{output}")]
    #[diagnostic(
        code(kubechart::cli::already_installed),
        help("the existing release has been uninstalled; run the install again")
    )]
    AlreadyInstalled { output: String },

    #[error("Release '{name}' is not installed")]
    #[diagnostic(code(kubechart::cli::not_installed))]
    NotInstalled { name: String },

    /// Helm failed with a message we don't recognize
    #[error("Helm failed\n{output}")]
    #[diagnostic(code(kubechart::cli::helm))]
    Helm { output: String },

    /// The helm executable could not be started
    #[error("Could not run '{program}': {message}")]
    #[diagnostic(
        code(kubechart::cli::helm_not_found),
        help("install helm or point --helm / KUBECHART_HELM at the executable")
    )]
    HelmNotFound { program: String, message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(kubechart::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(kubechart::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Definition { .. } => exit_codes::DEFINITION_ERROR,
            CliError::Chart { .. } => exit_codes::CHART_ERROR,
            CliError::ClusterUnavailable { .. } => exit_codes::CLUSTER_UNAVAILABLE,
            CliError::AlreadyInstalled { .. } => exit_codes::ALREADY_INSTALLED,
            CliError::NotInstalled { .. } => exit_codes::NOT_INSTALLED,
            CliError::Helm { .. } => exit_codes::HELM_ERROR,
            CliError::HelmNotFound { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a definition error
    pub fn definition(message: impl Into<String>) -> Self {
        Self::Definition {
            message: message.into(),
            help: None,
        }
    }

    /// Create a definition error with help text
    pub fn definition_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Definition {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => e.into(),
            CoreError::InvalidVersion(e) => CliError::Chart {
                message: format!("invalid chart version: {e}"),
                help: Some("chart versions must be SemVer, e.g. 0.1.0".to_string()),
            },
            other => CliError::Chart {
                message: other.to_string(),
                help: None,
            },
        }
    }
}

impl From<HelmError> for CliError {
    fn from(err: HelmError) -> Self {
        match err {
            HelmError::ClusterUnavailable { output } => CliError::ClusterUnavailable { output },
            HelmError::ChartAlreadyInstalled { output } => CliError::AlreadyInstalled { output },
            HelmError::ChartNotInstalled { name, .. } => CliError::NotInstalled { name },
            HelmError::Helm { output } | HelmError::Process { output, .. } => {
                CliError::Helm { output }
            }
            HelmError::Spawn { program, source } => CliError::HelmNotFound {
                program,
                message: source.to_string(),
            },
            HelmError::Core(e) => e.into(),
            HelmError::Io(e) => e.into(),
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<miette::Report> for CliError {
    fn from(err: miette::Report) -> Self {
        CliError::Other {
            message: format!("{:?}", err),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helm_errors_map_to_exit_codes() {
        let cases = [
            (
                HelmError::ClusterUnavailable { output: String::new() },
                exit_codes::CLUSTER_UNAVAILABLE,
            ),
            (
                HelmError::ChartAlreadyInstalled { output: String::new() },
                exit_codes::ALREADY_INSTALLED,
            ),
            (
                HelmError::ChartNotInstalled {
                    name: "demo".to_string(),
                    output: String::new(),
                },
                exit_codes::NOT_INSTALLED,
            ),
            (HelmError::Helm { output: "boom".to_string() }, exit_codes::HELM_ERROR),
            (HelmError::EmptyCommand, exit_codes::ERROR),
        ];

        for (err, code) in cases {
            assert_eq!(CliError::from(err).exit_code(), code);
        }
    }

    #[test]
    fn test_core_errors() {
        let err = CliError::from(CoreError::InvalidChart {
            message: "chart name must not be empty".to_string(),
        });
        assert_eq!(err.exit_code(), exit_codes::CHART_ERROR);
        assert!(err.to_string().contains("chart name must not be empty"));

        let io = CliError::from(HelmError::Io(std::io::Error::other("disk full")));
        assert_eq!(io.exit_code(), exit_codes::IO_ERROR);
    }
}
