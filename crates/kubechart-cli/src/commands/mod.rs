//! CLI commands

use std::path::{Path, PathBuf};

use kubechart_helm::{ChartBuilder, CommandRunner, HelmCommand, InstallOptions, SystemRunner, Table};

use crate::definition::ChartDefinition;
use crate::error::Result;

pub mod install;
pub mod list;
pub mod status;
pub mod template;
pub mod uninstall;
pub mod upgrade;

/// Settings shared by every command that talks to helm
#[derive(Debug, Clone)]
pub struct HelmSettings {
    pub helm: String,
    pub namespace: Option<String>,
}

impl HelmSettings {
    /// Namespace shown to the user when none was given
    pub fn namespace_label(&self) -> &str {
        self.namespace.as_deref().unwrap_or("default")
    }

    pub fn command(&self) -> HelmCommand {
        HelmCommand::new(self.helm.clone()).with_namespace(self.namespace.clone())
    }

    /// Load `definition` and wire it to the real helm
    pub fn builder(&self, definition: &Path, output_dir: Option<&Path>) -> Result<ChartBuilder<SystemRunner>> {
        let definition = ChartDefinition::load(definition)?;
        Ok(self.configure(definition.into_builder(resolve_output_dir(output_dir), SystemRunner)))
    }

    fn configure<R: CommandRunner>(&self, builder: ChartBuilder<R>) -> ChartBuilder<R> {
        let builder = builder.with_helm(self.helm.clone());
        match &self.namespace {
            Some(ns) => builder.with_namespace(ns.clone()),
            None => builder,
        }
    }
}

/// Flags shared by install and upgrade
#[derive(Debug, Clone, Default)]
pub struct ReleaseFlags {
    pub dependency_update: bool,
    pub skip_dependency_update: bool,
    pub create_namespace: bool,
    pub helm_args: Vec<String>,
}

impl ReleaseFlags {
    pub fn options(&self) -> InstallOptions {
        let mut options = InstallOptions::new();
        if self.skip_dependency_update {
            options = options.with_dependency_update(false);
        } else if self.dependency_update {
            options = options.with_dependency_update(true);
        }
        if self.create_namespace {
            options = options.with_create_namespace();
        }
        for arg in &self.helm_args {
            options = options.with_arg(arg.clone());
        }
        options
    }
}

/// Charts go to the system temp directory unless told otherwise
pub fn resolve_output_dir(output_dir: Option<&Path>) -> PathBuf {
    output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("kubechart"))
}

/// Table rows as column -> cell maps, in column order
pub fn rows(table: &Table) -> Vec<indexmap::IndexMap<String, String>> {
    let count = table.values().map(Vec::len).max().unwrap_or(0);
    (0..count)
        .map(|i| {
            table
                .iter()
                .map(|(column, cells)| (column.clone(), cells.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
