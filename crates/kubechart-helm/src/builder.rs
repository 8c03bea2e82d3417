//! Chart lifecycle: generate, install, upgrade, uninstall
//!
//! A [`ChartBuilder`] owns a chart descriptor, its objects and the
//! directory the chart is generated into. Every helm failure is
//! classified before it reaches the caller.
//!
//! # Example
//!
//! ```no_run
//! use kubechart_core::ChartInfo;
//! use kubechart_core::resources::ConfigMap;
//! use kubechart_helm::{ChartBuilder, InstallOptions};
//!
//! let mut builder = ChartBuilder::new(ChartInfo::new("demo", "0.1.0"), "/tmp/charts")
//!     .with_object(ConfigMap::new("settings").with_data("mode", "fast"));
//!
//! builder.install_chart(&InstallOptions::new())?;
//! assert!(builder.is_installed()?);
//! builder.uninstall_chart()?;
//! # Ok::<(), kubechart_helm::HelmError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kubechart_core::{ChartInfo, GeneratedChart, Resource, assemble};

use crate::command::HelmCommand;
use crate::error::{HelmError, Result};
use crate::options::InstallOptions;
use crate::runner::{CommandRunner, SystemRunner};
use crate::table::{Table, parse_table};

/// Where a chart is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    NotGenerated,
    Generated,
    InstallAttempted,
    Installed,
    UninstallAttempted,
    Uninstalled,
}

/// Generates a chart and drives helm for it
pub struct ChartBuilder<R: CommandRunner = SystemRunner> {
    chart: ChartInfo,
    objects: Vec<Box<dyn Resource>>,
    output_dir: PathBuf,
    keep_chart: bool,
    helm: HelmCommand,
    runner: R,
    state: LifecycleState,
}

impl ChartBuilder<SystemRunner> {
    /// Builder running the real helm executable
    ///
    /// The chart is generated into `output_dir/<chart name>`.
    pub fn new(chart: ChartInfo, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(chart, output_dir, SystemRunner)
    }
}

impl<R: CommandRunner> ChartBuilder<R> {
    pub fn with_runner(chart: ChartInfo, output_dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            chart,
            objects: Vec::new(),
            output_dir: output_dir.into(),
            keep_chart: false,
            helm: HelmCommand::default(),
            runner,
            state: LifecycleState::NotGenerated,
        }
    }

    pub fn with_object(mut self, object: impl Resource + 'static) -> Self {
        self.objects.push(Box::new(object));
        self
    }

    pub fn with_objects(mut self, objects: impl IntoIterator<Item = Box<dyn Resource>>) -> Self {
        self.objects.extend(objects);
        self
    }

    pub fn add_object(&mut self, object: Box<dyn Resource>) {
        self.objects.push(object);
    }

    /// Release namespace, passed to every helm command as `-n`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.helm = self.helm.with_namespace(Some(namespace.into()));
        self
    }

    /// Helm executable to invoke
    pub fn with_helm(mut self, binary: impl Into<String>) -> Self {
        let namespace = self.helm.namespace().map(str::to_string);
        self.helm = HelmCommand::new(binary).with_namespace(namespace);
        self
    }

    /// Keep the generated chart directory after a successful install
    pub fn keep_chart(mut self, keep: bool) -> Self {
        self.keep_chart = keep;
        self
    }

    pub fn chart(&self) -> &ChartInfo {
        &self.chart
    }

    pub fn objects(&self) -> &[Box<dyn Resource>] {
        &self.objects
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory the chart is generated into
    pub fn chart_dir(&self) -> PathBuf {
        self.output_dir.join(&self.chart.name)
    }

    /// Write the chart to disk, replacing any previous generation
    pub fn generate_chart(&mut self) -> Result<GeneratedChart> {
        let objects: Vec<&dyn Resource> = self.objects.iter().map(|o| o.as_ref()).collect();
        let generated = assemble(&self.chart, &objects, &self.chart_dir())?;

        if self.state == LifecycleState::NotGenerated {
            self.set_state(LifecycleState::Generated);
        }
        Ok(generated)
    }

    /// Register every non-local dependency repository with helm
    pub fn add_dependency_repos(&self) -> Result<()> {
        for dependency in self.chart.dependencies().iter().filter(|d| !d.is_local) {
            self.run(&self.helm.repo_add(dependency))?;
        }
        Ok(())
    }

    /// Generate the chart and install it
    ///
    /// On a name collision, or on a helm failure that could not be
    /// classified, any release with this name is uninstalled and the
    /// original error is returned. The install is not retried.
    pub fn install_chart(&mut self, options: &InstallOptions) -> Result<()> {
        let generated = self.generate_chart()?;
        self.add_dependency_repos()?;

        let path = fs::canonicalize(&generated.root)?;
        let command = self.helm.install(&self.chart, &path, options);
        self.set_state(LifecycleState::InstallAttempted);

        match self.run(&command) {
            Ok(_) => {
                self.set_state(LifecycleState::Installed);
                self.cleanup(&generated)
            }
            Err(err @ HelmError::ChartAlreadyInstalled { .. }) => Err(self.uninstall_after(err)),
            Err(err) if err.is_unclassified() => Err(self.uninstall_after(err)),
            Err(err) => Err(err),
        }
    }

    /// Regenerate the chart and upgrade the existing release
    pub fn upgrade_chart(&mut self, options: &InstallOptions) -> Result<()> {
        if !self.is_installed()? {
            return Err(self.not_installed());
        }

        let generated = self.generate_chart()?;
        self.add_dependency_repos()?;

        let path = fs::canonicalize(&generated.root)?;
        self.run(&self.helm.upgrade(&self.chart, &path, options))?;
        self.set_state(LifecycleState::Installed);
        self.cleanup(&generated)
    }

    /// Uninstall the release
    ///
    /// Fails with [`HelmError::ChartNotInstalled`] without calling
    /// `helm uninstall` when no release exists.
    pub fn uninstall_chart(&mut self) -> Result<()> {
        if !self.is_installed()? {
            return Err(self.not_installed());
        }

        self.set_state(LifecycleState::UninstallAttempted);
        self.run(&self.helm.uninstall(&self.chart.name))?;
        self.set_state(LifecycleState::Uninstalled);
        Ok(())
    }

    /// Whether `helm list` shows a release named after the chart
    pub fn is_installed(&self) -> Result<bool> {
        let releases = self.list_releases()?;
        Ok(releases
            .get("NAME")
            .is_some_and(|names| names.iter().any(|n| *n == self.chart.name)))
    }

    /// The parsed `helm list` table
    pub fn list_releases(&self) -> Result<Table> {
        let output = self.run(&self.helm.list())?;
        Ok(parse_table(output.as_bytes()))
    }

    fn run(&self, command: &str) -> Result<String> {
        self.runner.run(command).map_err(HelmError::classified)
    }

    fn uninstall_after(&mut self, err: HelmError) -> HelmError {
        match self.is_installed() {
            Ok(true) => {
                tracing::warn!(chart = %self.chart.name, error = %err, "install failed, uninstalling release");
                if let Err(cleanup) = self.uninstall_chart() {
                    tracing::warn!(chart = %self.chart.name, error = %cleanup, "compensating uninstall failed");
                }
            }
            Ok(false) => {}
            Err(check) => {
                tracing::warn!(chart = %self.chart.name, error = %check, "could not check release after failed install");
            }
        }
        err
    }

    fn cleanup(&self, generated: &GeneratedChart) -> Result<()> {
        if !self.keep_chart {
            generated.remove()?;
        }
        Ok(())
    }

    fn not_installed(&self) -> HelmError {
        HelmError::ChartNotInstalled {
            name: self.chart.name.clone(),
            output: String::new(),
        }
    }

    fn set_state(&mut self, state: LifecycleState) {
        tracing::debug!(chart = %self.chart.name, from = ?self.state, to = ?state, "lifecycle transition");
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHelm;
    use kubechart_core::ChartDependency;
    use kubechart_core::resources::{ConfigMap, Service, ServicePort, ServiceSpec};
    use tempfile::TempDir;

    fn demo(tmp: &TempDir, helm: &MockHelm) -> ChartBuilder<MockHelm> {
        ChartBuilder::with_runner(ChartInfo::new("demo", "0.1.0"), tmp.path(), helm.clone())
            .with_object(ConfigMap::new("demo-config").with_data("greeting", "hello"))
    }

    #[test]
    fn test_generate_chart() {
        let tmp = TempDir::new().unwrap();
        let mut builder = demo(&tmp, &MockHelm::new()).with_object(Service::default());

        let generated = builder.generate_chart().unwrap();

        assert_eq!(generated.root, tmp.path().join("demo"));
        assert_eq!(generated.templates.len(), 2);
        assert_eq!(builder.state(), LifecycleState::Generated);
        assert!(tmp.path().join("demo/templates/Service-0.yaml").exists());
    }

    #[test]
    fn test_lifecycle_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let mut builder = demo(&tmp, &helm);

        assert!(!builder.is_installed().unwrap());
        builder.install_chart(&InstallOptions::new()).unwrap();

        assert_eq!(builder.state(), LifecycleState::Installed);
        assert!(builder.is_installed().unwrap());
        assert!(!builder.chart_dir().exists());
        let release = helm.release("demo", "default").unwrap();
        assert_eq!(release.templates, vec!["ConfigMap-0.yaml"]);
        assert_eq!(release.chart, "demo-0.1.0");

        builder.uninstall_chart().unwrap();
        assert_eq!(builder.state(), LifecycleState::Uninstalled);
        assert!(!builder.is_installed().unwrap());
        assert!(helm.releases().is_empty());
    }

    #[test]
    fn test_install_uses_absolute_path() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let mut builder = demo(&tmp, &helm).keep_chart(true);

        builder.install_chart(&InstallOptions::new()).unwrap();

        let install = helm
            .commands()
            .into_iter()
            .find(|c| c.starts_with("helm install"))
            .unwrap();
        let expected = fs::canonicalize(tmp.path().join("demo")).unwrap();
        assert_eq!(install, format!("helm install demo {}", expected.display()));
        assert!(builder.chart_dir().join("Chart.yaml").exists());
    }

    #[test]
    fn test_collision_uninstalls_and_returns_error() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let mut first = demo(&tmp, &helm);
        first.install_chart(&InstallOptions::new()).unwrap();

        let mut second = demo(&tmp, &helm);
        let err = second.install_chart(&InstallOptions::new()).unwrap_err();

        assert!(matches!(err, HelmError::ChartAlreadyInstalled { .. }));
        assert_eq!(second.state(), LifecycleState::Uninstalled);
        assert!(!second.is_installed().unwrap());
        assert_eq!(helm.count("install"), 2);
        assert_eq!(helm.count("uninstall"), 1);
    }

    #[test]
    fn test_unclassified_failure_uninstalls_partial_release() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new().with_release("demo", "default");
        helm.fail_next("install", "Error: INSTALLATION FAILED: timed out waiting for the condition\n");
        let mut builder = demo(&tmp, &helm);

        let err = builder.install_chart(&InstallOptions::new()).unwrap_err();

        match err {
            HelmError::Helm { output } => assert!(output.contains("timed out")),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(helm.releases().is_empty());
        assert!(builder.chart_dir().exists());
    }

    #[test]
    fn test_unclassified_failure_without_release() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        helm.fail_next("install", "Error: template: demo/templates/x.yaml:1: bad\n");
        let mut builder = demo(&tmp, &helm);

        assert!(matches!(
            builder.install_chart(&InstallOptions::new()),
            Err(HelmError::Helm { .. })
        ));
        assert_eq!(builder.state(), LifecycleState::InstallAttempted);
        assert_eq!(helm.count("uninstall"), 0);
    }

    #[test]
    fn test_cluster_unavailable_is_returned_directly() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        helm.set_cluster_reachable(false);
        let mut builder = demo(&tmp, &helm);

        let err = builder.install_chart(&InstallOptions::new()).unwrap_err();

        assert!(matches!(err, HelmError::ClusterUnavailable { .. }));
        assert_eq!(helm.count("list"), 0);
        assert_eq!(helm.count("uninstall"), 0);
    }

    #[test]
    fn test_uninstall_not_installed_skips_helm() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let mut builder = demo(&tmp, &helm);

        let err = builder.uninstall_chart().unwrap_err();

        assert!(matches!(err, HelmError::ChartNotInstalled { ref name, .. } if name == "demo"));
        assert_eq!(helm.count("uninstall"), 0);
        assert_eq!(helm.count("list"), 1);
    }

    #[test]
    fn test_upgrade() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let mut builder = demo(&tmp, &helm);

        assert!(matches!(
            builder.upgrade_chart(&InstallOptions::new()),
            Err(HelmError::ChartNotInstalled { .. })
        ));

        builder.install_chart(&InstallOptions::new()).unwrap();
        builder.add_object(Box::new(Service::default()));
        builder.upgrade_chart(&InstallOptions::new()).unwrap();

        let release = helm.release("demo", "default").unwrap();
        assert_eq!(release.revision, 2);
        assert_eq!(release.templates, vec!["ConfigMap-0.yaml", "Service-0.yaml"]);
        assert_eq!(builder.state(), LifecycleState::Installed);
    }

    #[test]
    fn test_namespace_and_dependencies() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let chart = ChartInfo::new("demo", "0.1.0")
            .with_dependency(
                ChartDependency::new("redis", "17.0.0", "https://charts.example.com")
                    .with_repo_name("bitnami"),
            )
            .with_dependency(ChartDependency::local("common", "1.0.0", "file://../common"));
        let mut builder = ChartBuilder::with_runner(chart, tmp.path(), helm.clone())
            .with_namespace("apps")
            .with_object(Service {
                spec: Some(ServiceSpec {
                    ports: Some(vec![ServicePort::new(80)]),
                    ..Default::default()
                }),
                ..Default::default()
            });

        builder
            .install_chart(&InstallOptions::new().with_create_namespace())
            .unwrap();

        assert_eq!(
            helm.repos().into_iter().collect::<Vec<_>>(),
            vec![("bitnami".to_string(), "https://charts.example.com".to_string())]
        );
        let install = helm
            .commands()
            .into_iter()
            .find(|c| c.starts_with("helm install"))
            .unwrap();
        assert!(install.ends_with(" --dependency-update -n apps --create-namespace"));
        assert!(helm.release("demo", "apps").is_some());
        assert!(helm.release("demo", "default").is_none());
    }

    #[test]
    fn test_with_helm_keeps_namespace() {
        let tmp = TempDir::new().unwrap();
        let helm = MockHelm::new();
        let builder = demo(&tmp, &helm).with_namespace("apps").with_helm("/opt/helm");

        builder.is_installed().unwrap();
        assert_eq!(helm.commands(), vec!["/opt/helm list -n apps"]);
    }
}
