//! Core group (`v1`) resources

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::meta::{IntOrString, ListMeta, ObjectMeta};
use crate::object::{ApiGroup, TypedResource};
use crate::template::Templated;

/// ConfigMap holding plain configuration data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_data: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable: Option<bool>,
}

impl ConfigMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl TypedResource for ConfigMap {
    const KIND: &'static str = "ConfigMap";
    const GROUP: ApiGroup = ApiGroup::CORE;
}

/// A page of ConfigMaps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapList {
    pub metadata: ListMeta,
    pub items: Vec<ConfigMap>,
}

impl TypedResource for ConfigMapList {
    const KIND: &'static str = "ConfigMapList";
    const GROUP: ApiGroup = ApiGroup::CORE;
}

/// Secret data; values in `data` are base64 encoded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_data: Option<BTreeMap<String, String>>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable: Option<bool>,
}

impl Secret {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            ..Default::default()
        }
    }

    /// Add an entry to `data`, base64 encoding the bytes
    pub fn with_binary_data(mut self, key: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), STANDARD.encode(value));
        self
    }

    /// Add an entry to `stringData`, left for the API server to encode
    pub fn with_string_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl TypedResource for Secret {
    const KIND: &'static str = "Secret";
    const GROUP: ApiGroup = ApiGroup::CORE;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub metadata: ObjectMeta,
}

impl TypedResource for Namespace {
    const KIND: &'static str = "Namespace";
    const GROUP: ApiGroup = ApiGroup::CORE;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ServiceSpec>,
}

impl TypedResource for Service {
    const KIND: &'static str = "Service";
    const GROUP: ApiGroup = ApiGroup::CORE;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// `ClusterIP`, `NodePort`, `LoadBalancer` or `ExternalName`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<ServicePort>>,

    #[serde(rename = "clusterIP", default, skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub port: Templated<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl ServicePort {
    pub fn new(port: impl Into<Templated<i32>>) -> Self {
        Self {
            name: None,
            port: port.into(),
            target_port: None,
            protocol: None,
        }
    }
}
