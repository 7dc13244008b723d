//! Edge types for the lineage graph

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A directed edge between two nodes
///
/// Both endpoints must reference live nodes; duplicate edges between
/// the same ordered pair are permitted. Imported edges may arrive
/// without an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: Option<EdgeId>,
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    /// Create an edge with a freshly generated id
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            id: Some(EdgeId::new()),
            from,
            to,
        }
    }

    /// True if the edge starts or ends at `id`
    pub fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }
}
