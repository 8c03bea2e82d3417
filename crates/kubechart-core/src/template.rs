//! Helm template references
//!
//! A [`TemplateValue`] is never evaluated here. It serializes to the literal
//! token `{{ .Values.<path> }}` and is left for Helm to resolve at install
//! time.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Reference to a chart value, rendered as `{{ .Values.<path> }}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateValue {
    path: String,
}

impl TemplateValue {
    /// Create a reference from a dotted path such as `image.tag`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The dotted path under `.Values`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The literal template token
    pub fn token(&self) -> String {
        format!("{{{{ .Values.{} }}}}", self.path)
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

impl Serialize for TemplateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.token())
    }
}

impl From<TemplateValue> for String {
    fn from(value: TemplateValue) -> Self {
        value.token()
    }
}

/// A field that holds either a literal value or a template reference
///
/// Lets non-string fields (ports, replica counts) be driven from values:
///
/// ```
/// use kubechart_core::{Templated, TemplateValue};
///
/// let port: Templated<i32> = TemplateValue::new("service.port").into();
/// assert_eq!(serde_json::to_string(&port).unwrap(), "\"{{ .Values.service.port }}\"");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Templated<T> {
    Literal(T),
    Value(TemplateValue),
}

impl<T> From<TemplateValue> for Templated<T> {
    fn from(value: TemplateValue) -> Self {
        Templated::Value(value)
    }
}

macro_rules! templated_literal {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Templated<$ty> {
                fn from(value: $ty) -> Self {
                    Templated::Literal(value)
                }
            }
        )*
    };
}

templated_literal!(i32, i64, u32, bool, String);

impl From<&str> for Templated<String> {
    fn from(value: &str) -> Self {
        Templated::Literal(value.to_string())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Templated<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Templated::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::yaml::to_yaml;

    #[test]
    fn test_token_format() {
        let value = TemplateValue::new("image.tag");
        assert_eq!(value.token(), "{{ .Values.image.tag }}");
        assert_eq!(value.to_string(), "{{ .Values.image.tag }}");
        assert_eq!(value.path(), "image.tag");
    }

    #[test]
    fn test_token_emitted_quoted() {
        let node = Node::mapping().with("image", String::from(TemplateValue::new("image.name")));
        let out = to_yaml(&node).unwrap();

        assert_eq!(out, "image: '{{ .Values.image.name }}'\n");

        let parsed: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed["image"].as_str(), Some("{{ .Values.image.name }}"));
    }

    #[test]
    fn test_templated_literal_and_reference() {
        let literal: Templated<i32> = 8080.into();
        let reference: Templated<i32> = TemplateValue::new("service.port").into();

        assert_eq!(Node::from_serialize(&literal).unwrap(), Node::Int(8080));
        assert_eq!(
            Node::from_serialize(&reference).unwrap(),
            Node::from("{{ .Values.service.port }}")
        );
    }

    #[test]
    fn test_templated_deserializes_literal() {
        let port: Templated<i32> = serde_yaml::from_str("80").unwrap();
        assert_eq!(port, Templated::Literal(80));
    }
}
