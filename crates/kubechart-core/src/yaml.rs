//! Deterministic YAML emission
//!
//! A [`Node`] tree is written with `serde_yaml`. Mapping keys come out in
//! lexicographic order (nodes are `BTreeMap` backed), absent values are
//! dropped, and scalars that would read back as another type are quoted.

use crate::error::Result;
use crate::node::Node;

/// Render a node tree as YAML text
///
/// The output ends with a newline unless the root is absent, in which case
/// it is empty.
pub fn to_yaml(node: &Node) -> Result<String> {
    if node.is_absent() {
        return Ok(String::new());
    }

    let yaml = serde_yaml::to_string(node)?;
    Ok(yaml.trim_start_matches("---\n").to_string())
}
