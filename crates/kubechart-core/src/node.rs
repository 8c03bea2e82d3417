//! Intermediate value model for serializable objects
//!
//! Every typed object is converted into a [`Node`] tree before it is written
//! out. Mappings are backed by a `BTreeMap`, so key order is always
//! lexicographic regardless of how the tree was built.

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::error::Result;

/// A node of the value model
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// An explicit null, emitted as `null`
    Null,
    Bool(bool),
    Int(i64),
    /// Integer above `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
    /// Ordered sequence
    Seq(Vec<Node>),
    /// Key-ordered mapping
    Map(BTreeMap<String, Node>),
    /// An unset optional value. Never emitted: the key holding it (or the
    /// sequence slot) is dropped during serialization.
    #[default]
    Absent,
}

impl Node {
    /// Create an empty mapping
    pub fn mapping() -> Self {
        Node::Map(BTreeMap::new())
    }

    /// Convert any serializable value into a node tree
    ///
    /// Fields skipped by serde (e.g. `skip_serializing_if = "Option::is_none"`)
    /// never reach the tree; a nested `None` that serde does emit becomes
    /// [`Node::Null`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Node::from(serde_json::to_value(value)?))
    }

    /// Insert a key into a mapping node
    ///
    /// Has no effect on non-mapping nodes.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        if let Node::Map(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Builder-style variant of [`Node::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a key in a mapping node
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key).filter(|n| !n.is_absent()),
            _ => None,
        }
    }

    /// Look up a value by dotted path (e.g. `metadata.name`)
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        path.split('.').try_fold(self, |node, part| node.get(part))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Whether a collection holds no emitted entries
    ///
    /// Absent entries do not count. Scalars are never empty; `Absent` is.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Map(map) => map.values().all(Node::is_absent),
            Node::Seq(seq) => seq.iter().all(Node::is_absent),
            Node::Absent => true,
            _ => false,
        }
    }

    /// Deep merge another node into this one
    ///
    /// Rules:
    /// - Mappings: recursive merge
    /// - Absent overlay: base is kept
    /// - Anything else: overlay replaces base
    pub fn merge(&mut self, overlay: &Node) {
        match (self, overlay) {
            (_, Node::Absent) => {}
            (Node::Map(base), Node::Map(over)) => {
                for (key, value) in over {
                    match base.get_mut(key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            base.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            (base, over) => *base = over.clone(),
        }
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::Null,
            JsonValue::Bool(b) => Node::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Node::UInt(u)
                } else {
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Node::Str(s),
            JsonValue::Array(items) => Node::Seq(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(map) => {
                Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

/// Absent entries are skipped; an absent root serializes as null.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Null | Node::Absent => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::UInt(u) => serializer.serialize_u64(*u),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::Str(s) => serializer.serialize_str(s),
            Node::Seq(items) => serializer.collect_seq(items.iter().filter(|n| !n.is_absent())),
            Node::Map(map) => {
                serializer.collect_map(map.iter().filter(|(_, v)| !v.is_absent()))
            }
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Str(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Str(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int(value.into())
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Int(value.into())
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Node::UInt(value), Node::Int)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Float(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Absent)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Node::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<BTreeMap<String, T>> for Node {
    fn from(value: BTreeMap<String, T>) -> Self {
        Node::Map(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
