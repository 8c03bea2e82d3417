//! Kubechart Core - Typed Kubernetes objects rendered into Helm charts
//!
//! This crate provides the foundational types used throughout Kubechart:
//! - `Node`: The intermediate value model every object converts into
//! - `to_yaml`: Deterministic YAML emission for a `Node` tree
//! - `Resource`: Root Kubernetes objects carrying `kind` and `apiVersion`
//! - `ChartInfo`: The chart descriptor written to Chart.yaml
//! - `assemble`: Chart directory generation on disk

pub mod assembler;
pub mod chart;
pub mod error;
pub mod node;
pub mod object;
pub mod resources;
pub mod template;
pub mod time;
pub mod yaml;

pub use assembler::{GeneratedChart, RenderedFile, assemble, render};
pub use chart::{ChartDependency, ChartInfo, ChartType, Maintainer};
pub use error::{CoreError, Result};
pub use node::Node;
pub use object::{
    ApiGroup, DEFAULT_API_VERSION, Overridden, RawObject, Resource, TypedResource,
    resolve_api_version,
};
pub use template::{TemplateValue, Templated};
pub use yaml::to_yaml;
