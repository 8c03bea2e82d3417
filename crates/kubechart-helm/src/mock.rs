//! In-memory helm for testing
//!
//! `MockHelm` answers the same command lines the real helm receives and
//! keeps a release table in memory, so lifecycle code can be exercised
//! without a cluster. Failures are reported with helm's own wording.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use kubechart_core::ChartInfo;

use crate::error::{HelmError, Result};
use crate::runner::{CommandRunner, split_command};

const DEFAULT_NAMESPACE: &str = "default";
const DEPLOYED_AT: &str = "2024-01-01 00:00:00.000000 +0000 UTC";

/// A release known to the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRelease {
    pub name: String,
    pub namespace: String,
    pub revision: u32,
    /// `<chart name>-<version>`, read from Chart.yaml
    pub chart: String,
    /// Template file names found in the chart at install or upgrade time
    pub templates: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    /// (namespace, name) -> release
    releases: BTreeMap<(String, String), MockRelease>,
    /// alias -> url
    repos: BTreeMap<String, String>,
    commands: Vec<String>,
    failures: Vec<(String, String)>,
    unreachable: bool,
}

/// In-memory [`CommandRunner`] mimicking helm
#[derive(Debug, Clone, Default)]
pub struct MockHelm {
    state: Arc<RwLock<MockState>>,
}

impl MockHelm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a release, as if installed earlier
    pub fn with_release(self, name: &str, namespace: &str) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.releases.insert(
                (namespace.to_string(), name.to_string()),
                MockRelease {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                    revision: 1,
                    chart: format!("{name}-0.1.0"),
                    templates: Vec::new(),
                },
            );
        }
        self
    }

    /// Make every command fail as if the cluster were down
    pub fn set_cluster_reachable(&self, reachable: bool) {
        self.state.write().unwrap().unreachable = !reachable;
    }

    /// Fail the next `action` (e.g. `install`) with `output`
    pub fn fail_next(&self, action: &str, output: impl Into<String>) {
        self.state
            .write()
            .unwrap()
            .failures
            .push((action.to_string(), output.into()));
    }

    /// Every command line received, in order
    pub fn commands(&self) -> Vec<String> {
        self.state.read().unwrap().commands.clone()
    }

    /// Number of received commands whose action is `action`
    pub fn count(&self, action: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| split_command(c).get(1) == Some(&action))
            .count()
    }

    /// All current releases
    pub fn releases(&self) -> Vec<MockRelease> {
        self.state.read().unwrap().releases.values().cloned().collect()
    }

    pub fn release(&self, name: &str, namespace: &str) -> Option<MockRelease> {
        self.state
            .read()
            .unwrap()
            .releases
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Registered repositories (alias -> url)
    pub fn repos(&self) -> BTreeMap<String, String> {
        self.state.read().unwrap().repos.clone()
    }
}

impl CommandRunner for MockHelm {
    fn run(&self, command: &str) -> Result<String> {
        if split_command(command).is_empty() {
            return Err(HelmError::EmptyCommand);
        }

        let mut state = self.state.write().unwrap();
        state.commands.push(command.to_string());
        tracing::info!(command, "mock helm");

        handle(&mut state, command)
            .map_err(|output| HelmError::Process {
                command: command.to_string(),
                status: "exit status: 1".to_string(),
                output,
            })
    }
}

fn handle(state: &mut MockState, command: &str) -> std::result::Result<String, String> {
    let argv = split_command(command);
    let action = argv.get(1).copied().unwrap_or_default();

    if state.unreachable && action != "repo" {
        return Err(
            "Error: Kubernetes cluster unreachable: Get \"https://127.0.0.1:6443/version\": dial tcp 127.0.0.1:6443: connect: connection refused\n"
                .to_string(),
        );
    }
    if let Some(pos) = state.failures.iter().position(|(a, _)| a == action) {
        return Err(state.failures.remove(pos).1);
    }

    let args = Args::parse(argv.get(2..).unwrap_or_default());
    match action {
        "install" => install(state, &args),
        "upgrade" => upgrade(state, &args),
        "uninstall" => uninstall(state, &args),
        "list" => Ok(list(state, &args)),
        "repo" => repo(state, &args),
        other => Err(format!("Error: unknown command \"{other}\" for \"helm\"\n")),
    }
}

/// Positional arguments plus the flags the mock understands
struct Args<'a> {
    positional: Vec<&'a str>,
    namespace: String,
}

impl<'a> Args<'a> {
    fn parse(argv: &[&'a str]) -> Self {
        let mut positional = Vec::new();
        let mut namespace = DEFAULT_NAMESPACE.to_string();
        let mut iter = argv.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "-n" | "--namespace" => {
                    if let Some(ns) = iter.next() {
                        namespace = ns.to_string();
                    }
                }
                "--username" | "--password" => {
                    iter.next();
                }
                flag if flag.starts_with('-') => {}
                value => positional.push(value),
            }
        }
        Self {
            positional,
            namespace,
        }
    }

    fn key(&self) -> Option<(String, String)> {
        self.positional
            .first()
            .map(|name| (self.namespace.clone(), name.to_string()))
    }
}

fn install(state: &mut MockState, args: &Args<'_>) -> std::result::Result<String, String> {
    let (Some(key), Some(path)) = (args.key(), args.positional.get(1)) else {
        return Err("Error: INSTALLATION FAILED: must either provide a name or specify --generate-name\n".to_string());
    };
    if state.releases.contains_key(&key) {
        return Err("Error: INSTALLATION FAILED: cannot re-use a name that is still in use\n".to_string());
    }
    let (chart, templates) = read_chart(Path::new(path))
        .ok_or_else(|| format!("Error: INSTALLATION FAILED: path \"{path}\" not found\n"))?;

    let release = MockRelease {
        name: key.1.clone(),
        namespace: key.0.clone(),
        revision: 1,
        chart,
        templates,
    };
    let out = deployed_notes(&release);
    state.releases.insert(key, release);
    Ok(out)
}

fn upgrade(state: &mut MockState, args: &Args<'_>) -> std::result::Result<String, String> {
    let (Some(key), Some(path)) = (args.key(), args.positional.get(1)) else {
        return Err("Error: \"helm upgrade\" requires 2 arguments\n".to_string());
    };
    let (chart, templates) = read_chart(Path::new(path))
        .ok_or_else(|| format!("Error: UPGRADE FAILED: path \"{path}\" not found\n"))?;
    let Some(release) = state.releases.get_mut(&key) else {
        return Err(format!("Error: UPGRADE FAILED: \"{}\" has no deployed releases\n", key.1));
    };

    release.revision += 1;
    release.chart = chart;
    release.templates = templates;
    Ok(format!(
        "Release \"{}\" has been upgraded. Happy Helming!\n{}",
        release.name,
        deployed_notes(release)
    ))
}

fn uninstall(state: &mut MockState, args: &Args<'_>) -> std::result::Result<String, String> {
    let Some(key) = args.key() else {
        return Err("Error: \"helm uninstall\" requires at least 1 argument\n".to_string());
    };
    match state.releases.remove(&key) {
        Some(release) => Ok(format!("release \"{}\" uninstalled\n", release.name)),
        None => Err(format!(
            "Error: uninstall: Release not loaded: {}: release: not found\n",
            key.1
        )),
    }
}

fn list(state: &MockState, args: &Args<'_>) -> String {
    let header = ["NAME", "NAMESPACE", "REVISION", "UPDATED", "STATUS", "CHART", "APP VERSION"];
    let rows: Vec<[String; 7]> = state
        .releases
        .values()
        .filter(|r| r.namespace == args.namespace)
        .map(|r| {
            [
                r.name.clone(),
                r.namespace.clone(),
                r.revision.to_string(),
                DEPLOYED_AT.to_string(),
                "deployed".to_string(),
                r.chart.clone(),
                String::new(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_row = header.map(str::to_string);
    std::iter::once(&header_row)
        .chain(&rows)
        .map(|row| {
            let last = row.len() - 1;
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == last {
                        cell.clone()
                    } else {
                        format!("{cell:<width$}\t", width = widths[i])
                    }
                })
                .collect::<String>()
                + "\n"
        })
        .collect()
}

fn repo(state: &mut MockState, args: &Args<'_>) -> std::result::Result<String, String> {
    match args.positional.as_slice() {
        ["add", alias, url] => {
            state.repos.insert(alias.to_string(), url.to_string());
            Ok(format!("\"{alias}\" has been added to your repositories\n"))
        }
        _ => Err("Error: unsupported repo command\n".to_string()),
    }
}

fn deployed_notes(release: &MockRelease) -> String {
    format!(
        "NAME: {}\nLAST DEPLOYED: {DEPLOYED_AT}\nNAMESPACE: {}\nSTATUS: deployed\nREVISION: {}\nTEST SUITE: None\n",
        release.name, release.namespace, release.revision
    )
}

/// Chart label and template file names, or `None` if there is no chart
fn read_chart(path: &Path) -> Option<(String, Vec<String>)> {
    let descriptor = fs::read_to_string(path.join("Chart.yaml")).ok()?;
    let info: ChartInfo = serde_yaml::from_str(&descriptor).ok()?;
    let chart = format!("{}-{}", info.name, info.version);

    let mut templates: Vec<String> = fs::read_dir(path.join("templates"))
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    templates.sort();

    Some((chart, templates))
}
