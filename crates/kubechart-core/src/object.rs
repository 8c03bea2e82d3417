//! Root Kubernetes objects
//!
//! Every object written to a chart template is a [`Resource`]: it knows its
//! `kind`, resolves its `apiVersion`, and converts its fields into a
//! [`Node`]. Only root objects carry `kind` and `apiVersion`; nested
//! structures are plain serializable structs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::node::Node;

/// Version used when neither a pinned nor an explicit version applies
pub const DEFAULT_API_VERSION: &str = "v1";

/// API group a resource family belongs to
///
/// `prefix` includes the trailing slash (`apps/`), or is empty for the core
/// group. `pinned` is set for kinds that only exist at a non-standard
/// version (e.g. `v2` for autoscaling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiGroup {
    pub prefix: &'static str,
    pub pinned: Option<&'static str>,
}

impl ApiGroup {
    pub const CORE: ApiGroup = ApiGroup::new("");
    pub const APPS: ApiGroup = ApiGroup::new("apps/");
    pub const NETWORKING: ApiGroup = ApiGroup::new("networking.k8s.io/");
    pub const APIEXTENSIONS: ApiGroup = ApiGroup::new("apiextensions.k8s.io/");
    pub const EVENTS: ApiGroup = ApiGroup::new("events.k8s.io/");
    pub const AUTOSCALING: ApiGroup = ApiGroup::new("autoscaling/");

    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            pinned: None,
        }
    }

    /// Pin this group to a fixed version
    pub const fn pinned(self, version: &'static str) -> Self {
        Self {
            prefix: self.prefix,
            pinned: Some(version),
        }
    }
}

/// Resolve the `apiVersion` string for a resource
///
/// Precedence: pinned version, then the explicit override, then the default.
/// The group prefix is always prepended.
pub fn resolve_api_version(group: ApiGroup, explicit: Option<&str>, default: &str) -> String {
    let version = group.pinned.or(explicit).unwrap_or(default);
    format!("{}{}", group.prefix, version)
}

/// A root object that can be rendered as a manifest
pub trait Resource {
    /// Resource type tag, also used to name the template file
    fn kind(&self) -> &str;

    /// Fully resolved `apiVersion`
    fn api_version(&self) -> String;

    /// The object's own fields, without `kind` and `apiVersion`
    fn body(&self) -> Result<Node>;

    /// The complete manifest with `kind` and `apiVersion` set
    fn to_node(&self) -> Result<Node> {
        check_kind(self.kind())?;

        let mut node = match self.body()? {
            Node::Absent => Node::mapping(),
            map @ Node::Map(_) => map,
            _ => {
                return Err(CoreError::InvalidObject {
                    message: format!("{} did not serialize to a mapping", self.kind()),
                });
            }
        };
        node.insert("apiVersion", self.api_version());
        node.insert("kind", self.kind());
        Ok(node)
    }

    /// Render the manifest as YAML
    fn to_yaml(&self) -> Result<String> {
        crate::yaml::to_yaml(&self.to_node()?)
    }
}

/// A kind names a template file, so it must be a single path component
fn check_kind(kind: &str) -> Result<()> {
    if kind.is_empty() {
        return Err(CoreError::InvalidObject {
            message: "kind must not be empty".to_string(),
        });
    }
    if kind.contains(['/', '\\']) || kind.contains("..") || kind.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidObject {
            message: format!("kind '{kind}' must not contain slashes, '..' or whitespace"),
        });
    }
    Ok(())
}

/// A statically typed resource
///
/// The kind is declared once per type; nothing is inferred at runtime.
pub trait TypedResource: Serialize {
    const KIND: &'static str;
    const GROUP: ApiGroup;

    /// Override the version part of `apiVersion` for this instance
    ///
    /// Ignored when the type's group is pinned.
    fn with_api_version(self, version: impl Into<String>) -> Overridden<Self>
    where
        Self: Sized,
    {
        Overridden {
            resource: self,
            api_version: version.into(),
        }
    }
}

impl<T: TypedResource> Resource for T {
    fn kind(&self) -> &str {
        T::KIND
    }

    fn api_version(&self) -> String {
        resolve_api_version(T::GROUP, None, DEFAULT_API_VERSION)
    }

    fn body(&self) -> Result<Node> {
        Node::from_serialize(self)
    }
}

/// A typed resource with an explicit version override
#[derive(Debug, Clone)]
pub struct Overridden<T> {
    pub resource: T,
    pub api_version: String,
}

impl<T: TypedResource> Resource for Overridden<T> {
    fn kind(&self) -> &str {
        T::KIND
    }

    fn api_version(&self) -> String {
        resolve_api_version(T::GROUP, Some(&self.api_version), DEFAULT_API_VERSION)
    }

    fn body(&self) -> Result<Node> {
        Node::from_serialize(&self.resource)
    }
}

/// An untyped manifest, e.g. loaded from a YAML file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObject {
    pub api_version: String,
    pub kind: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl RawObject {
    /// Parse a single manifest from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let object: RawObject = serde_yaml::from_str(yaml)?;
        if object.kind.is_empty() || object.api_version.is_empty() {
            return Err(CoreError::InvalidObject {
                message: "manifest requires non-empty kind and apiVersion".to_string(),
            });
        }
        Ok(object)
    }
}

impl Resource for RawObject {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn api_version(&self) -> String {
        self.api_version.clone()
    }

    fn body(&self) -> Result<Node> {
        Node::from_serialize(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Default)]
    struct Widget {
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u32>,
    }

    impl TypedResource for Widget {
        const KIND: &'static str = "Widget";
        const GROUP: ApiGroup = ApiGroup::new("example.com/");
    }

    #[derive(Serialize, Default)]
    struct Scaler {}

    impl TypedResource for Scaler {
        const KIND: &'static str = "Scaler";
        const GROUP: ApiGroup = ApiGroup::AUTOSCALING.pinned("v2");
    }

    #[test]
    fn test_resolve_api_version_precedence() {
        let plain = ApiGroup::APPS;
        let pinned = ApiGroup::APPS.pinned("v1beta2");

        assert_eq!(resolve_api_version(plain, None, "v1"), "apps/v1");
        assert_eq!(resolve_api_version(plain, Some("v2"), "v1"), "apps/v2");
        assert_eq!(resolve_api_version(pinned, Some("v2"), "v1"), "apps/v1beta2");
        assert_eq!(resolve_api_version(ApiGroup::CORE, None, "v1"), "v1");
    }

    #[test]
    fn test_root_carries_kind_and_api_version() {
        let node = Widget { size: Some(3) }.to_node().unwrap();

        assert_eq!(node.get("kind").and_then(Node::as_str), Some("Widget"));
        assert_eq!(
            node.get("apiVersion").and_then(Node::as_str),
            Some("example.com/v1")
        );
        assert_eq!(node.get("size"), Some(&Node::Int(3)));
    }

    #[test]
    fn test_empty_object_still_has_header() {
        let yaml = Widget::default().to_yaml().unwrap();
        assert_eq!(yaml, "apiVersion: example.com/v1\nkind: Widget\n");
    }

    #[test]
    fn test_override_and_pinned() {
        assert_eq!(
            Widget::default().with_api_version("v1alpha1").api_version(),
            "example.com/v1alpha1"
        );
        assert_eq!(Scaler::default().api_version(), "autoscaling/v2");
        assert_eq!(
            Scaler::default().with_api_version("v1").api_version(),
            "autoscaling/v2"
        );
    }

    #[test]
    fn test_raw_object_from_yaml() {
        let raw = RawObject::from_yaml(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: demo\ndata:\n  key: value\n",
        )
        .unwrap();

        assert_eq!(raw.kind(), "ConfigMap");
        assert_eq!(raw.api_version(), "v1");
        assert_eq!(
            raw.to_yaml().unwrap(),
            "apiVersion: v1\ndata:\n  key: value\nkind: ConfigMap\nmetadata:\n  name: demo\n"
        );
    }

    #[test]
    fn test_raw_object_requires_kind() {
        assert!(RawObject::from_yaml("apiVersion: v1\nkind: \"\"\n").is_err());
        assert!(RawObject::from_yaml("metadata: {}\n").is_err());
    }

    #[test]
    fn test_kind_must_be_a_file_name() {
        for kind in ["../../escaped", "a/b", "a\\b", "..", "Config Map", "\tTab"] {
            let raw = RawObject {
                api_version: "v1".to_string(),
                kind: kind.to_string(),
                fields: BTreeMap::new(),
            };
            assert!(
                matches!(raw.to_node(), Err(CoreError::InvalidObject { .. })),
                "kind {kind:?} should be rejected"
            );
        }
    }
}
