//! Kubechart Helm - drive the helm CLI for generated charts
//!
//! This crate turns a [`ChartInfo`](kubechart_core::ChartInfo) and its
//! objects into a release:
//! - [`ChartBuilder`]: generate, install, upgrade and uninstall a chart
//! - [`CommandRunner`]: the seam between lifecycle logic and process execution
//! - [`classify`]: map helm's failure text to typed errors
//! - [`parse_table`]: read the column-aligned output of `helm list`
//! - [`MockHelm`]: an in-memory helm for tests

pub mod builder;
pub mod classify;
pub mod command;
pub mod error;
pub mod mock;
pub mod options;
pub mod runner;
pub mod table;

pub use builder::{ChartBuilder, LifecycleState};
pub use classify::classify;
pub use command::{DEFAULT_HELM, HelmCommand};
pub use error::{HelmError, Result};
pub use mock::{MockHelm, MockRelease};
pub use options::InstallOptions;
pub use runner::{CommandRunner, SystemRunner, split_command};
pub use table::{Table, parse_table};
