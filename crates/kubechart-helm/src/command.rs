//! Helm command lines
//!
//! Commands are assembled as plain strings and later split on whitespace
//! by the runner. Nothing here is shell-escaped.

use std::path::Path;

use kubechart_core::{ChartDependency, ChartInfo};

use crate::options::InstallOptions;

/// Default helm executable
pub const DEFAULT_HELM: &str = "helm";

/// Builds helm command lines for one executable and namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmCommand {
    binary: String,
    namespace: Option<String>,
}

impl Default for HelmCommand {
    fn default() -> Self {
        Self::new(DEFAULT_HELM)
    }
}

impl HelmCommand {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `helm install <name> <path> [--dependency-update] [-n <ns>] [--create-namespace] [extra...]`
    pub fn install(&self, chart: &ChartInfo, path: &Path, options: &InstallOptions) -> String {
        let mut parts = self.release_parts("install", chart, path, options);
        if options.create_namespace {
            parts.push("--create-namespace".to_string());
        }
        parts.extend(options.extra_args.iter().cloned());
        parts.join(" ")
    }

    /// `helm upgrade <name> <path> [--dependency-update] [-n <ns>] [extra...]`
    pub fn upgrade(&self, chart: &ChartInfo, path: &Path, options: &InstallOptions) -> String {
        let mut parts = self.release_parts("upgrade", chart, path, options);
        parts.extend(options.extra_args.iter().cloned());
        parts.join(" ")
    }

    /// `helm uninstall <name> [-n <ns>]`
    pub fn uninstall(&self, name: &str) -> String {
        let mut parts = vec![self.binary.clone(), "uninstall".to_string(), name.to_string()];
        self.push_namespace(&mut parts);
        parts.join(" ")
    }

    /// `helm list [-n <ns>]`
    pub fn list(&self) -> String {
        let mut parts = vec![self.binary.clone(), "list".to_string()];
        self.push_namespace(&mut parts);
        parts.join(" ")
    }

    /// `helm repo add [--username "<u>"] [--password "<p>"] <alias> <url>`
    ///
    /// Credentials are wrapped in double quotes with inner quotes escaped.
    /// Since there is no shell, helm receives the quotes as part of the
    /// value.
    pub fn repo_add(&self, dependency: &ChartDependency) -> String {
        let mut parts = vec![self.binary.clone(), "repo".to_string(), "add".to_string()];
        if let Some(username) = &dependency.username {
            parts.push(format!("--username {}", quote(username)));
        }
        if let Some(password) = &dependency.password {
            parts.push(format!("--password {}", quote(password)));
        }
        parts.push(dependency.local_repo_name().to_string());
        parts.push(dependency.repository.clone());
        parts.join(" ")
    }

    fn release_parts(
        &self,
        action: &str,
        chart: &ChartInfo,
        path: &Path,
        options: &InstallOptions,
    ) -> Vec<String> {
        let mut parts = vec![
            self.binary.clone(),
            action.to_string(),
            chart.name.clone(),
            path.display().to_string(),
        ];
        if options.updates_dependencies(chart) {
            parts.push("--dependency-update".to_string());
        }
        self.push_namespace(&mut parts);
        parts
    }

    fn push_namespace(&self, parts: &mut Vec<String>) {
        if let Some(ns) = &self.namespace {
            parts.push("-n".to_string());
            parts.push(ns.clone());
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}
