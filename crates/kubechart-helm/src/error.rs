//! Error types for kubechart-helm

use thiserror::Error;

/// Result type for kubechart-helm operations
pub type Result<T> = std::result::Result<T, HelmError>;

/// Errors that can occur while driving helm
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HelmError {
    /// The cluster could not be reached
    #[error("Kubernetes cluster unavailable:\n{output}")]
    ClusterUnavailable { output: String },

    /// A release with the chart's name already exists
    #[error("chart is already installed:\n{output}")]
    ChartAlreadyInstalled { output: String },

    /// The release to act on does not exist
    #[error("chart '{name}' is not installed{}", format_output(.output))]
    ChartNotInstalled { name: String, output: String },

    /// Helm failed with a message that has no specific meaning here
    #[error("helm error:\n{output}")]
    Helm { output: String },

    /// A command exited non-zero; not yet classified
    #[error("command '{command}' failed ({status}):\n{output}")]
    Process {
        command: String,
        status: String,
        output: String,
    },

    /// The executable could not be started
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Empty command line
    #[error("empty command")]
    EmptyCommand,

    /// Chart model or generation error
    #[error(transparent)]
    Core(#[from] kubechart_core::CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(":\n{output}")
    }
}

impl HelmError {
    /// Raw tool output carried by this error, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            HelmError::ClusterUnavailable { output }
            | HelmError::ChartAlreadyInstalled { output }
            | HelmError::ChartNotInstalled { output, .. }
            | HelmError::Helm { output }
            | HelmError::Process { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Turn an unclassified process failure into a typed error
    ///
    /// Other variants are returned unchanged.
    pub fn classified(self) -> Self {
        match self {
            HelmError::Process { output, .. } => crate::classify::classify(&output),
            other => other,
        }
    }

    /// Whether this is the generic, unrecognized helm failure
    pub fn is_unclassified(&self) -> bool {
        matches!(self, HelmError::Helm { .. } | HelmError::Process { .. })
    }
}
