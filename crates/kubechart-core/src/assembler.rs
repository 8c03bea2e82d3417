//! Chart directory generation
//!
//! Lays out a chart the way Helm expects it:
//!
//! ```text
//! <chart>/
//!   Chart.yaml
//!   values.yaml          # only when there are values
//!   templates/
//!     <Kind>-0.yaml
//!     <Kind>-1.yaml
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::ChartInfo;
use crate::error::Result;
use crate::object::Resource;
use crate::yaml::to_yaml;

const CHART_FILE: &str = "Chart.yaml";
const VALUES_FILE: &str = "values.yaml";
const TEMPLATES_DIR: &str = "templates";

/// A chart written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedChart {
    /// Chart root directory
    pub root: PathBuf,

    /// Path of Chart.yaml
    pub chart_file: PathBuf,

    /// Template files in the order their objects were supplied
    pub templates: Vec<PathBuf>,

    /// Path of values.yaml, if one was written
    pub values_file: Option<PathBuf>,
}

impl GeneratedChart {
    /// Templates directory
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    /// Every file currently under the chart root, sorted
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }

    /// Delete the chart directory
    pub fn remove(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
            tracing::debug!(path = %self.root.display(), "removed generated chart");
        }
        Ok(())
    }
}

/// A chart file rendered in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the chart root
    pub path: PathBuf,
    pub content: String,
}

/// Render `descriptor` and `objects` without touching the filesystem
///
/// Files come out in write order: Chart.yaml, the templates in supply
/// order, then values.yaml when there are values. Template files are named
/// `{kind}-{n}.yaml` with `n` counting per kind.
pub fn render<R: Resource + ?Sized>(descriptor: &ChartInfo, objects: &[&R]) -> Result<Vec<RenderedFile>> {
    descriptor.validate()?;

    let mut files = Vec::with_capacity(objects.len() + 2);
    files.push(RenderedFile {
        path: PathBuf::from(CHART_FILE),
        content: to_yaml(&descriptor.to_node()?)?,
    });

    let mut counters: HashMap<String, usize> = HashMap::new();
    for object in objects {
        let kind = object.kind().to_string();
        let index = counters.entry(kind.clone()).or_insert(0);
        files.push(RenderedFile {
            path: Path::new(TEMPLATES_DIR).join(format!("{kind}-{index}.yaml")),
            content: object.to_yaml()?,
        });
        *index += 1;
    }

    let values = descriptor.values_node()?;
    if !values.is_empty() {
        files.push(RenderedFile {
            path: PathBuf::from(VALUES_FILE),
            content: to_yaml(&values)?,
        });
    }

    Ok(files)
}

/// Write `descriptor` and `objects` as a chart under `target_dir`
///
/// Any existing directory at `target_dir` is removed first, so repeated
/// calls never leave stale templates behind.
pub fn assemble<R: Resource + ?Sized>(
    descriptor: &ChartInfo,
    objects: &[&R],
    target_dir: &Path,
) -> Result<GeneratedChart> {
    let files = render(descriptor, objects)?;

    if target_dir.exists() {
        fs::remove_dir_all(target_dir)?;
    }
    fs::create_dir_all(target_dir.join(TEMPLATES_DIR))?;

    let mut generated = GeneratedChart {
        root: target_dir.to_path_buf(),
        chart_file: target_dir.join(CHART_FILE),
        templates: Vec::with_capacity(objects.len()),
        values_file: None,
    };
    for file in files {
        let path = target_dir.join(&file.path);
        fs::write(&path, &file.content)?;
        tracing::debug!(path = %path.display(), "wrote chart file");

        if file.path.starts_with(TEMPLATES_DIR) {
            generated.templates.push(path);
        } else if file.path == Path::new(VALUES_FILE) {
            generated.values_file = Some(path);
        }
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartDependency;
    use crate::error::CoreError;
    use crate::object::RawObject;
    use crate::resources::{ConfigMap, Secret, Service};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn names(chart: &GeneratedChart) -> Vec<String> {
        chart
            .templates
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_layout_and_contents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("demo");
        let cm = ConfigMap::new("settings").with_data("key", "value");

        let chart = assemble(&ChartInfo::new("demo", "0.1.0"), &[&cm as &dyn Resource], &root)
            .unwrap();

        assert_eq!(chart.chart_file, root.join("Chart.yaml"));
        assert_eq!(names(&chart), vec!["ConfigMap-0.yaml"]);
        assert!(chart.values_file.is_none());
        assert_eq!(
            fs::read_to_string(root.join("Chart.yaml")).unwrap(),
            "apiVersion: v2\nname: demo\nversion: 0.1.0\n"
        );
        assert_eq!(
            fs::read_to_string(root.join("templates/ConfigMap-0.yaml")).unwrap(),
            cm.to_yaml().unwrap()
        );
    }

    #[test]
    fn test_per_kind_counters_with_interleaving() {
        let tmp = TempDir::new().unwrap();
        let a = ConfigMap::new("a");
        let b = Secret::new("b");
        let c = ConfigMap::new("c");
        let d = Service::default();
        let e = ConfigMap::new("e");
        let objects: Vec<&dyn Resource> = vec![&a, &b, &c, &d, &e];

        let chart = assemble(&ChartInfo::new("mix", "1.0.0"), &objects, tmp.path()).unwrap();

        assert_eq!(
            names(&chart),
            vec![
                "ConfigMap-0.yaml",
                "Secret-0.yaml",
                "ConfigMap-1.yaml",
                "Service-0.yaml",
                "ConfigMap-2.yaml",
            ]
        );
        let on_disk = fs::read_dir(chart.templates_dir()).unwrap().count();
        assert_eq!(on_disk, 5);
        assert!(
            fs::read_to_string(chart.templates_dir().join("ConfigMap-1.yaml"))
                .unwrap()
                .contains("name: c\n")
        );
    }

    #[test]
    fn test_regeneration_removes_stale_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("demo");
        let info = ChartInfo::new("demo", "0.1.0");
        let first: Vec<ConfigMap> = (0..3).map(|i| ConfigMap::new(format!("cm-{i}"))).collect();
        let refs: Vec<&ConfigMap> = first.iter().collect();

        assemble(&info, &refs, &root).unwrap();
        fs::write(root.join("stray.txt"), "leftover").unwrap();

        let single = ConfigMap::new("only");
        let chart = assemble(&info, &[&single], &root).unwrap();

        assert_eq!(
            chart.files(),
            vec![root.join("Chart.yaml"), root.join("templates/ConfigMap-0.yaml")]
        );
    }

    #[test]
    fn test_idempotent_generation() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("demo");
        let info = ChartInfo::new("demo", "0.1.0").with_value("replicas", serde_json::json!(2));
        let cm = ConfigMap::new("a").with_data("x", "1");

        let first = assemble(&info, &[&cm], &root).unwrap();
        let snapshot: Vec<(PathBuf, String)> = first
            .files()
            .into_iter()
            .map(|p| {
                let content = fs::read_to_string(&p).unwrap();
                (p, content)
            })
            .collect();

        let second = assemble(&info, &[&cm], &root).unwrap();
        let again: Vec<(PathBuf, String)> = second
            .files()
            .into_iter()
            .map(|p| {
                let content = fs::read_to_string(&p).unwrap();
                (p, content)
            })
            .collect();

        assert_eq!(first, second);
        assert_eq!(snapshot, again);
    }

    #[test]
    fn test_values_file_written() {
        let tmp = TempDir::new().unwrap();
        let info = ChartInfo::new("demo", "0.1.0").with_dependency(
            ChartDependency::new("redis", "17.0.0", "https://charts.example.com").with_values(
                BTreeMap::from([("replica".to_string(), serde_json::json!({"count": 1}))]),
            ),
        );

        let chart = assemble::<ConfigMap>(&info, &[], tmp.path()).unwrap();

        assert_eq!(chart.values_file, Some(tmp.path().join("values.yaml")));
        assert_eq!(
            fs::read_to_string(tmp.path().join("values.yaml")).unwrap(),
            "redis:\n  replica:\n    count: 1\n"
        );
        assert!(chart.templates.is_empty());
    }

    #[test]
    fn test_invalid_chart_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("bad");

        assert!(assemble::<ConfigMap>(&ChartInfo::new("bad", "x"), &[], &root).is_err());
        assert!(!root.exists());
    }

    #[test]
    fn test_render_in_memory() {
        let cm = ConfigMap::new("a");
        let secret = Secret::new("b");
        let objects: Vec<&dyn Resource> = vec![&cm, &secret];
        let info = ChartInfo::new("demo", "0.1.0").with_value("replicas", serde_json::json!(1));

        let files = render(&info, &objects).unwrap();

        let paths: Vec<&Path> = files.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("Chart.yaml"),
                Path::new("templates/ConfigMap-0.yaml"),
                Path::new("templates/Secret-0.yaml"),
                Path::new("values.yaml"),
            ]
        );
        assert_eq!(files[3].content, "replicas: 1\n");
    }

    #[test]
    fn test_remove() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("demo");
        let chart = assemble::<ConfigMap>(&ChartInfo::new("demo", "0.1.0"), &[], &root).unwrap();

        chart.remove().unwrap();
        assert!(!root.exists());
        chart.remove().unwrap();
    }

    #[test]
    fn test_kind_cannot_escape_chart_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("out").join("demo");
        let raw = RawObject {
            api_version: "v1".to_string(),
            kind: "../../escaped".to_string(),
            fields: BTreeMap::new(),
        };

        let err = assemble(&ChartInfo::new("demo", "0.1.0"), &[&raw], &root).unwrap_err();

        assert!(matches!(err, CoreError::InvalidObject { .. }));
        assert!(!tmp.path().join("out/escaped-0.yaml").exists());
        assert!(!root.exists());
    }
}

