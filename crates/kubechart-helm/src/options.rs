//! Options for install and upgrade

use kubechart_core::ChartInfo;

/// Options for `helm install` and `helm upgrade`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Pass `--dependency-update`
    ///
    /// `None` enables it whenever the chart declares dependencies.
    pub dependency_update: Option<bool>,

    /// Create the release namespace if it doesn't exist (install only)
    pub create_namespace: bool,

    /// Additional flags appended verbatim
    ///
    /// The command line is split on whitespace, so a flag value cannot
    /// contain spaces.
    pub extra_args: Vec<String>,
}

impl InstallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `--dependency-update` on or off
    pub fn with_dependency_update(mut self, enabled: bool) -> Self {
        self.dependency_update = Some(enabled);
        self
    }

    pub fn with_create_namespace(mut self) -> Self {
        self.create_namespace = true;
        self
    }

    /// Append a raw flag such as `--wait` or `--timeout=5m`
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Whether `--dependency-update` applies to `chart`
    pub fn updates_dependencies(&self, chart: &ChartInfo) -> bool {
        self.dependency_update
            .unwrap_or_else(|| !chart.dependencies().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubechart_core::ChartDependency;

    #[test]
    fn test_dependency_update_defaults_to_chart() {
        let plain = ChartInfo::new("demo", "0.1.0");
        let with_dep = ChartInfo::new("demo", "0.1.0").with_dependency(ChartDependency::new(
            "redis",
            "17.0.0",
            "https://charts.example.com",
        ));

        let options = InstallOptions::new();
        assert!(!options.updates_dependencies(&plain));
        assert!(options.updates_dependencies(&with_dep));

        let forced_off = InstallOptions::new().with_dependency_update(false);
        assert!(!forced_off.updates_dependencies(&with_dep));
        let forced_on = InstallOptions::new().with_dependency_update(true);
        assert!(forced_on.updates_dependencies(&plain));
    }

    #[test]
    fn test_builder() {
        let options = InstallOptions::new()
            .with_create_namespace()
            .with_arg("--wait")
            .with_arg("--timeout=5m");

        assert!(options.create_namespace);
        assert_eq!(options.extra_args, vec!["--wait", "--timeout=5m"]);
    }
}
