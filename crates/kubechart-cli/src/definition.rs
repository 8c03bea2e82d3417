//! Chart definition files
//!
//! A definition bundles the chart descriptor with raw manifests:
//!
//! ```yaml
//! chart:
//!   name: demo
//!   version: 0.1.0
//!   values:
//!     replicas: 2
//! objects:
//!   - apiVersion: v1
//!     kind: ConfigMap
//!     metadata:
//!       name: demo-config
//!     data:
//!       greeting: hello
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kubechart_core::{ChartInfo, RawObject, Resource};
use kubechart_helm::{ChartBuilder, CommandRunner};
use serde::Deserialize;

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct ChartDefinition {
    pub chart: ChartInfo,

    #[serde(default)]
    pub objects: Vec<RawObject>,
}

impl ChartDefinition {
    /// Load and check a definition file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::definition(format!("failed to read {}: {}", path.display(), e))
        })?;
        let definition = Self::parse(&content).map_err(|err| match err {
            CliError::Definition { message, help } => CliError::Definition {
                message: format!("{}: {}", path.display(), message),
                help,
            },
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            chart = %definition.chart.name,
            objects = definition.objects.len(),
            "loaded chart definition"
        );
        Ok(definition)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let definition: ChartDefinition = serde_yaml::from_str(content).map_err(|e| {
            CliError::definition_with_help(
                e.to_string(),
                "a definition needs a `chart:` mapping with name and version, and an optional `objects:` list",
            )
        })?;

        for (index, object) in definition.objects.iter().enumerate() {
            if object.kind.is_empty() || object.api_version.is_empty() {
                return Err(CliError::definition(format!(
                    "object {index} needs a non-empty kind and apiVersion"
                )));
            }
        }

        Ok(definition)
    }

    /// Objects as trait objects, ready for the assembler
    pub fn resources(&self) -> Vec<&dyn Resource> {
        self.objects.iter().map(|o| o as &dyn Resource).collect()
    }

    /// A lifecycle builder for this chart
    pub fn into_builder<R: CommandRunner>(self, output_dir: PathBuf, runner: R) -> ChartBuilder<R> {
        let objects = self
            .objects
            .into_iter()
            .map(|o| Box::new(o) as Box<dyn Resource>);
        ChartBuilder::with_runner(self.chart, output_dir, runner).with_objects(objects)
    }
}
