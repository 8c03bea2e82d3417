//! Helm failure classification
//!
//! Helm reports failures as free text on stderr. This module maps the
//! messages we act on to typed errors; everything else is wrapped as a
//! generic [`HelmError::Helm`] carrying the raw output.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::HelmError;

/// Newer helm versions insert an action prefix such as `INSTALLATION FAILED: `
const ACTION_PREFIX: &str = r"(?:[A-Z][A-Z ]*: )?";

static CLUSTER_UNREACHABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"Error: {ACTION_PREFIX}Kubernetes cluster unreachable"))
        .expect("valid regex")
});

static NAME_IN_USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"Error: {ACTION_PREFIX}cannot re-use a name that is still in use"
    ))
    .expect("valid regex")
});

static RELEASE_NOT_FOUND: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"Release not loaded: (?P<name>[^:\s]+): release: not found",
        r#""(?P<name>[^"]+)" has no deployed releases"#,
        r"release: not found",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Classify the combined output of a failed helm command
///
/// Rules are checked in priority order: cluster unreachable, name in use,
/// release not found. Never fails; unrecognized output becomes
/// [`HelmError::Helm`].
pub fn classify(output: &str) -> HelmError {
    let output_owned = || output.to_string();

    if CLUSTER_UNREACHABLE.is_match(output) {
        return HelmError::ClusterUnavailable {
            output: output_owned(),
        };
    }

    if NAME_IN_USE.is_match(output) {
        return HelmError::ChartAlreadyInstalled {
            output: output_owned(),
        };
    }

    for pattern in RELEASE_NOT_FOUND.iter() {
        if let Some(caps) = pattern.captures(output) {
            let name = caps
                .name("name")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return HelmError::ChartNotInstalled {
                name,
                output: output_owned(),
            };
        }
    }

    HelmError::Helm {
        output: output_owned(),
    }
}
