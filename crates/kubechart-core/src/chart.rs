//! Chart descriptor (Chart.yaml) and dependencies

use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::node::Node;

/// Chart API version written when none is given
pub const DEFAULT_CHART_API_VERSION: &str = "v2";

/// Chart descriptor, serialized to Chart.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInfo {
    /// Chart API version (v2 for Helm 3)
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Chart name (required)
    pub name: String,

    /// Chart version (required, SemVer)
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Chart type (application or library)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<Vec<Maintainer>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<ChartDependency>>,

    /// Chart-level values, written to values.yaml rather than Chart.yaml
    #[serde(default, skip_serializing)]
    pub values: BTreeMap<String, serde_json::Value>,
}

fn default_api_version() -> String {
    DEFAULT_CHART_API_VERSION.to_string()
}

/// Chart type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Application,
    Library,
}

/// Maintainer information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Chart dependency
///
/// Only `name`, `version`, `repository`, `condition` and `tags` end up in
/// Chart.yaml. The rest drives repository registration and values.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDependency {
    pub name: String,

    /// Version constraint
    pub version: String,

    /// Repository URL, or a `file://` path for local charts
    pub repository: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Name the repository is registered under with `helm repo add`
    ///
    /// Defaults to the dependency name.
    #[serde(default, skip_serializing)]
    pub repo_name: Option<String>,

    /// Values passed to the dependency, nested under its name in values.yaml
    #[serde(default, skip_serializing)]
    pub values: Option<BTreeMap<String, serde_json::Value>>,

    /// Local charts skip repository registration
    #[serde(default, skip_serializing)]
    pub is_local: bool,

    #[serde(default, skip_serializing)]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl ChartDependency {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            repository: repository.into(),
            condition: None,
            tags: None,
            repo_name: None,
            values: None,
            is_local: false,
            username: None,
            password: None,
        }
    }

    /// Dependency served from the local filesystem
    pub fn local(name: impl Into<String>, version: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            is_local: true,
            ..Self::new(name, version, path)
        }
    }

    pub fn with_repo_name(mut self, repo_name: impl Into<String>) -> Self {
        self.repo_name = Some(repo_name.into());
        self
    }

    pub fn with_values(mut self, values: BTreeMap<String, serde_json::Value>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Effective repository name for `helm repo add`
    pub fn local_repo_name(&self) -> &str {
        self.repo_name.as_deref().unwrap_or(&self.name)
    }
}

impl ChartInfo {
    /// Create a chart descriptor with the default API version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            api_version: default_api_version(),
            name: name.into(),
            version: version.into(),
            app_version: None,
            description: None,
            chart_type: None,
            kube_version: None,
            keywords: None,
            home: None,
            sources: None,
            icon: None,
            deprecated: None,
            maintainers: None,
            annotations: None,
            dependencies: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = Some(app_version.into());
        self
    }

    pub fn with_maintainer(mut self, maintainer: Maintainer) -> Self {
        self.maintainers.get_or_insert_with(Vec::new).push(maintainer);
        self
    }

    pub fn with_dependency(mut self, dependency: ChartDependency) -> Self {
        self.dependencies.get_or_insert_with(Vec::new).push(dependency);
        self
    }

    /// Set a chart-level value
    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Declared dependencies
    pub fn dependencies(&self) -> &[ChartDependency] {
        self.dependencies.as_deref().unwrap_or_default()
    }

    /// Check required fields and formats
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CoreError::InvalidChart {
                message: "chart name must not be empty".to_string(),
            });
        }
        if self.name.contains(['/', '\\']) || self.name.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidChart {
                message: format!("chart name '{}' must not contain slashes or whitespace", self.name),
            });
        }

        Version::parse(&self.version)?;

        for dep in self.dependencies() {
            if dep.name.is_empty() {
                return Err(CoreError::InvalidChart {
                    message: "dependency name must not be empty".to_string(),
                });
            }
            if !dep.is_local {
                url::Url::parse(&dep.repository).map_err(|e| CoreError::InvalidChart {
                    message: format!(
                        "dependency '{}' has invalid repository '{}': {}",
                        dep.name, dep.repository, e
                    ),
                })?;
            }
        }

        Ok(())
    }

    /// The Chart.yaml node
    pub fn to_node(&self) -> Result<Node> {
        Node::from_serialize(self)
    }

    /// Merged values.yaml content
    ///
    /// Chart values first, then each dependency's values under the
    /// dependency name.
    pub fn values_node(&self) -> Result<Node> {
        let mut values = Node::from_serialize(&self.values)?;

        for dep in self.dependencies() {
            if let Some(dep_values) = &dep.values {
                let overlay = Node::mapping().with(dep.name.clone(), Node::from_serialize(dep_values)?);
                values.merge(&overlay);
            }
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::to_yaml;
    use serde_json::json;

    #[test]
    fn test_chart_yaml_minimal() {
        let chart = ChartInfo::new("demo", "0.1.0");

        assert_eq!(
            to_yaml(&chart.to_node().unwrap()).unwrap(),
            "apiVersion: v2\nname: demo\nversion: 0.1.0\n"
        );
    }

    #[test]
    fn test_chart_yaml_full() {
        let chart = ChartInfo::new("web", "1.2.3")
            .with_description("A web app")
            .with_app_version("2.0")
            .with_maintainer(Maintainer {
                name: "Ops".to_string(),
                email: Some("ops@example.com".to_string()),
                url: None,
            })
            .with_dependency(
                ChartDependency::new("redis", "17.0.0", "https://charts.bitnami.com/bitnami")
                    .with_repo_name("bitnami")
                    .with_credentials("u", "p")
                    .with_values(BTreeMap::from([("enabled".to_string(), json!(true))])),
            )
            .with_value("replicas", json!(2));

        insta::assert_snapshot!(to_yaml(&chart.to_node().unwrap()).unwrap(), @r###"
        apiVersion: v2
        appVersion: '2.0'
        dependencies:
        - name: redis
          repository: https://charts.bitnami.com/bitnami
          version: 17.0.0
        description: A web app
        maintainers:
        - email: ops@example.com
          name: Ops
        name: web
        version: 1.2.3
        "###);
    }

    #[test]
    fn test_chart_deserialize_defaults() {
        let yaml = r#"
name: demo
version: 0.1.0
values:
  image:
    tag: latest
dependencies:
  - name: common
    version: 1.x
    repository: file://../common
    isLocal: true
"#;
        let chart: ChartInfo = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(chart.api_version, "v2");
        assert_eq!(chart.values["image"], json!({"tag": "latest"}));
        assert!(chart.dependencies()[0].is_local);
        assert_eq!(chart.dependencies()[0].local_repo_name(), "common");
    }

    #[test]
    fn test_values_node_merges_dependencies() {
        let chart = ChartInfo::new("demo", "0.1.0")
            .with_value("redis", json!({"architecture": "standalone"}))
            .with_value("replicas", json!(1))
            .with_dependency(
                ChartDependency::new("redis", "17.0.0", "https://charts.example.com")
                    .with_values(BTreeMap::from([("auth".to_string(), json!({"enabled": false}))])),
            )
            .with_dependency(ChartDependency::new("pg", "12.0.0", "https://charts.example.com"));

        let values = chart.values_node().unwrap();

        assert_eq!(
            values,
            Node::from(json!({
                "redis": {"architecture": "standalone", "auth": {"enabled": false}},
                "replicas": 1
            }))
        );
    }

    #[test]
    fn test_values_node_empty_without_values() {
        assert!(ChartInfo::new("demo", "0.1.0").values_node().unwrap().is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(ChartInfo::new("demo", "0.1.0").validate().is_ok());
        assert!(ChartInfo::new("", "0.1.0").validate().is_err());
        assert!(ChartInfo::new("a/b", "0.1.0").validate().is_err());
        assert!(matches!(
            ChartInfo::new("demo", "one").validate(),
            Err(CoreError::InvalidVersion(_))
        ));

        let bad_repo = ChartInfo::new("demo", "0.1.0")
            .with_dependency(ChartDependency::new("x", "1.0.0", "not a url"));
        assert!(bad_repo.validate().is_err());

        let local = ChartInfo::new("demo", "0.1.0")
            .with_dependency(ChartDependency::local("x", "1.0.0", "../x"));
        assert!(local.validate().is_ok());
    }
}
