//! Node types for the lineage graph

use crate::error::Error;
use crate::version::{Version, VersionId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node, immutable after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Role of a node in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Source,
    #[default]
    Transform,
    Output,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Source => "source",
            NodeType::Transform => "transform",
            NodeType::Output => "output",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(NodeType::Source),
            "transform" => Ok(NodeType::Transform),
            "output" => Ok(NodeType::Output),
            other => Err(Error::Validation(format!(
                "invalid node type: {other} (expected source, transform or output)"
            ))),
        }
    }
}

/// A node in the lineage graph
///
/// The two property maps preserve insertion order and never hold two
/// entries with the same key. The ledger fields are only meaningful on
/// `Source` nodes; other types carry them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Display label (non-empty)
    pub label: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Pipeline role
    #[serde(default, rename = "type")]
    pub node_type: NodeType,

    /// Arbitrary key/value properties
    #[serde(default)]
    pub properties: IndexMap<String, String>,

    /// Filesystem-path properties, checked through the path boundary
    #[serde(default)]
    pub path_properties: IndexMap<String, String>,

    /// Dataset versions attached to this node (source nodes)
    #[serde(default)]
    pub dataset_versions: Vec<Version>,

    /// Id of the active dataset version, if any
    #[serde(default)]
    pub current_version_id: Option<VersionId>,
}

impl Node {
    /// Create a node with defaults for everything but id and label
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            description: String::new(),
            node_type: NodeType::default(),
            properties: IndexMap::new(),
            path_properties: IndexMap::new(),
            dataset_versions: Vec::new(),
            current_version_id: None,
        }
    }
}

/// Data for creating a new node; the store assigns the id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    pub label: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "type")]
    pub node_type: NodeType,

    #[serde(default)]
    pub properties: IndexMap<String, String>,

    #[serde(default)]
    pub path_properties: IndexMap<String, String>,
}

impl NewNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_path_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_properties.insert(key.into(), value.into());
        self
    }
}

/// Partial update for a node
///
/// Scalar fields replace the existing value; the two property maps are
/// merged key by key (existing keys not named in the patch survive).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, rename = "type")]
    pub node_type: Option<NodeType>,

    #[serde(default)]
    pub properties: Option<IndexMap<String, String>>,

    #[serde(default)]
    pub path_properties: Option<IndexMap<String, String>>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn set_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn set_path_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_properties
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.node_type.is_none()
            && self.properties.is_none()
            && self.path_properties.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults() {
        let node = Node::new(NodeId(1), "raw_events");

        assert_eq!(node.label, "raw_events");
        assert_eq!(node.description, "");
        assert_eq!(node.node_type, NodeType::Transform);
        assert!(node.properties.is_empty());
        assert!(node.path_properties.is_empty());
        assert!(node.dataset_versions.is_empty());
        assert!(node.current_version_id.is_none());
    }

    #[test]
    fn test_node_type_round_trip() {
        for (s, t) in [
            ("source", NodeType::Source),
            ("transform", NodeType::Transform),
            ("output", NodeType::Output),
        ] {
            assert_eq!(s.parse::<NodeType>().unwrap(), t);
            assert_eq!(t.as_str(), s);
        }
        assert!("pipeline".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let mut node = Node::new(NodeId(7), "events");
        node.path_properties
            .insert("input".to_string(), "/data/in.csv".to_string());

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "transform");
        assert_eq!(json["pathProperties"]["input"], "/data/in.csv");
        assert!(json.get("datasetVersions").is_some());
        assert!(json.get("currentVersionId").is_some());
    }

    #[test]
    fn test_property_map_preserves_insertion_order() {
        let draft = NewNode::new("n")
            .with_property("zeta", "1")
            .with_property("alpha", "2")
            .with_property("mid", "3");

        let keys: Vec<_> = draft.properties.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
