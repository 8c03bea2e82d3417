//! Typed Kubernetes resources
//!
//! Plain data holders: each root type declares its `kind` and API group via
//! [`TypedResource`](crate::object::TypedResource); everything else is
//! serde attributes.

pub mod apiextensions;
pub mod core_v1;
pub mod events;
pub mod meta;
pub mod networking;

pub use apiextensions::{
    CustomResourceDefinition, CustomResourceDefinitionNames, CustomResourceDefinitionSpec,
    CustomResourceDefinitionVersion, CustomResourceValidation, JsonSchemaProps,
};
pub use core_v1::{ConfigMap, ConfigMapList, Namespace, Secret, Service, ServicePort, ServiceSpec};
pub use events::{Event, EventSource};
pub use meta::{
    IntOrString, LabelSelector, LabelSelectorRequirement, ListMeta, ObjectMeta, ObjectReference,
};
pub use networking::{
    IpBlock, NetworkPolicy, NetworkPolicyEgressRule, NetworkPolicyIngressRule, NetworkPolicyPeer,
    NetworkPolicyPort, NetworkPolicySpec,
};
