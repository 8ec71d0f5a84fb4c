//! Decoded LRM history: node → resource → ordered operation records.
//!
//! Records are built once per decode pass and are read-only afterwards.
//! Attributes the classifier or accessor reads get named fields; everything
//! else on the source element is kept verbatim in `extra` for display.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{CibError, Result};
use crate::status::{classify, ResourceStatus};

/// Default ordering key for operations without a `call-id` attribute.
pub const DEFAULT_CALL_ID: &str = "0";

/// One historical action taken on a resource instance (`lrm_rsc_op`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(rename = "op-status", skip_serializing_if = "Option::is_none")]
    pub op_status: Option<String>,
    #[serde(rename = "rc-code", skip_serializing_if = "Option::is_none")]
    pub rc_code: Option<String>,
    #[serde(rename = "call-id", skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Remaining attributes, serialized alongside the named ones.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Operation {
    /// Builds an operation from its attribute list. `id` is the only
    /// attribute an operation must carry.
    pub fn from_attributes<'a, I>(id: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut op = Self {
            id: id.into(),
            operation: None,
            op_status: None,
            rc_code: None,
            call_id: None,
            extra: BTreeMap::new(),
        };

        for (key, value) in attributes {
            let value = value.to_string();
            match key {
                "id" => {}
                "operation" => op.operation = Some(value),
                "op-status" => op.op_status = Some(value),
                "rc-code" => op.rc_code = Some(value),
                "call-id" => op.call_id = Some(value),
                _ => {
                    op.extra.insert(key.to_string(), value);
                }
            }
        }

        op
    }

    /// The ordering key, defaulting to `"0"` when the attribute is absent.
    pub fn call_id_key(&self) -> &str {
        self.call_id.as_deref().unwrap_or(DEFAULT_CALL_ID)
    }

    /// Looks up a pass-through attribute (e.g. `last-rc-change`).
    pub fn extra_attr(&self, name: &str) -> Option<&str> {
        self.extra.get(name).map(String::as_str)
    }
}

/// One resource instance as managed on one node (`lrm_resource`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub status: ResourceStatus,
    pub ops: Vec<Operation>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Resource {
    /// Builds a resource with no operations and `unknown` status.
    pub fn from_attributes<'a, I>(id: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut resource = Self {
            id: id.into(),
            class: None,
            provider: None,
            kind: None,
            status: ResourceStatus::Unknown,
            ops: Vec::new(),
            extra: BTreeMap::new(),
        };

        for (key, value) in attributes {
            let value = value.to_string();
            match key {
                "id" => {}
                "class" => resource.class = Some(value),
                "provider" => resource.provider = Some(value),
                "type" => resource.kind = Some(value),
                _ => {
                    resource.extra.insert(key.to_string(), value);
                }
            }
        }

        resource
    }

    /// Attaches the operation history, ordering it by `call-id` and deriving
    /// `status` from it.
    pub fn with_ops(mut self, mut ops: Vec<Operation>) -> Self {
        sort_ops(&mut ops);
        self.status = classify(&ops);
        self.ops = ops;
        self
    }

    /// Re-runs the classifier over the stored history.
    pub fn recompute_status(&self) -> ResourceStatus {
        classify(&self.ops)
    }

    /// Resource agent identity rendered as `class::provider::type`.
    pub fn agent(&self) -> String {
        format!(
            "{}::{}::{}",
            self.class.as_deref().unwrap_or(""),
            self.provider.as_deref().unwrap_or(""),
            self.kind.as_deref().unwrap_or("")
        )
    }
}

/// Orders operations ascending by their textual `call-id`.
///
/// Keys compare as strings, so `"10"` sorts before `"9"`. The sort is stable:
/// operations with equal keys keep their document order.
pub fn sort_ops(ops: &mut [Operation]) {
    ops.sort_by(|a, b| a.call_id_key().cmp(b.call_id_key()));
}

/// One cluster member and the resources its LRM reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub resources: BTreeMap<String, Resource>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resources: BTreeMap::new(),
        }
    }

    /// Looks up a resource by identifier.
    pub fn resource(&self, id: &str) -> Result<&Resource> {
        self.resources
            .get(id)
            .ok_or_else(|| CibError::ResourceNotFound {
                node: self.id.clone(),
                resource: id.to_string(),
            })
    }

    /// Resources in ascending identifier order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Inserts a resource, replacing any earlier one with the same id.
    pub fn insert(&mut self, resource: Resource) {
        self.resources.insert(resource.id.clone(), resource);
    }
}

/// The decoded model: node identifier → node record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CibModel {
    nodes: BTreeMap<String, Node>,
}

impl CibModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a node by identifier.
    pub fn node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| CibError::NodeNotFound(id.to_string()))
    }

    /// Looks up a resource on a node; a missing node wins over a missing resource.
    pub fn resource(&self, node: &str, resource: &str) -> Result<&Resource> {
        self.node(node)?.resource(resource)
    }

    /// Nodes in ascending identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a node, replacing any earlier one with the same id.
    pub fn insert(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }
}
