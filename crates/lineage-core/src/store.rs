//! The graph store: owns the node/edge collections

use crate::edge::{Edge, EdgeId};
use crate::error::{Error, Result};
use crate::node::{NewNode, Node, NodeId, NodePatch};
use crate::version::VersionLedger;
use serde::{Deserialize, Serialize};

/// Serialized form of a whole graph
///
/// Round-trips through export -> import without loss; every optional
/// node field is materialized to its default on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// In-memory store for one lineage graph
///
/// All mutation goes through this API; mutations are synchronous and
/// atomic with respect to each other. Storage order is stable and is
/// the export order.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_id: u64,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_id: 1,
        }
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node_index(&self, id: NodeId) -> Result<usize> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(Error::NodeNotFound(id))
    }

    /// Add a node, assigning a fresh unique id
    pub fn add_node(&mut self, draft: NewNode) -> Result<&Node> {
        if draft.label.trim().is_empty() {
            return Err(Error::Validation("node label must not be empty".to_string()));
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;

        let node = Node {
            id,
            label: draft.label,
            description: draft.description,
            node_type: draft.node_type,
            properties: draft.properties,
            path_properties: draft.path_properties,
            dataset_versions: Vec::new(),
            current_version_id: None,
        };
        tracing::debug!(node = %id, label = %node.label, r#type = %node.node_type, "added node");

        self.nodes.push(node);
        let index = self.nodes.len() - 1;
        Ok(&self.nodes[index])
    }

    /// Add a directed edge between two existing nodes
    ///
    /// Duplicate edges over the same ordered pair are permitted.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<&Edge> {
        if !self.contains(from) {
            return Err(Error::NodeNotFound(from));
        }
        if !self.contains(to) {
            return Err(Error::NodeNotFound(to));
        }

        let edge = Edge::new(from, to);
        tracing::debug!(from = %from, to = %to, "added edge");
        self.edges.push(edge);
        let index = self.edges.len() - 1;
        Ok(&self.edges[index])
    }

    /// Delete an edge by id
    pub fn delete_edge(&mut self, id: &EdgeId) -> Result<Edge> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.id.as_ref() == Some(id))
            .ok_or_else(|| Error::EdgeNotFound(id.to_string()))?;
        Ok(self.edges.remove(pos))
    }

    /// Merge a patch into an existing node
    ///
    /// Scalar fields are replaced; the two property maps merge key by
    /// key, leaving keys absent from the patch untouched.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Result<&Node> {
        let index = self.node_index(id)?;
        if let Some(ref label) = patch.label {
            if label.trim().is_empty() {
                return Err(Error::Validation("node label must not be empty".to_string()));
            }
        }

        let node = &mut self.nodes[index];
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(description) = patch.description {
            node.description = description;
        }
        if let Some(node_type) = patch.node_type {
            node.node_type = node_type;
        }
        if let Some(properties) = patch.properties {
            node.properties.extend(properties);
        }
        if let Some(path_properties) = patch.path_properties {
            node.path_properties.extend(path_properties);
        }
        tracing::debug!(node = %id, "updated node");
        Ok(&self.nodes[index])
    }

    /// Replace a stored node wholesale with an edited copy
    ///
    /// Used by the edit session on save, where property deletions must
    /// carry through. The node's id picks the slot to replace.
    pub fn replace_node(&mut self, node: Node) -> Result<&Node> {
        let index = self.node_index(node.id)?;
        if node.label.trim().is_empty() {
            return Err(Error::Validation("node label must not be empty".to_string()));
        }
        if let Some(ref current) = node.current_version_id {
            if !node.dataset_versions.iter().any(|v| v.id == *current) {
                return Err(Error::Validation(format!(
                    "current version {current} is not in the node's ledger"
                )));
            }
        }

        self.nodes[index] = node;
        Ok(&self.nodes[index])
    }

    /// Delete a node, cascading deletion of every incident edge
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node> {
        let index = self.node_index(id)?;
        let removed = self.nodes.remove(index);

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        tracing::debug!(
            node = %id,
            cascaded_edges = before - self.edges.len(),
            "deleted node"
        );
        Ok(removed)
    }

    /// Detached copy of a node's version ledger
    pub fn ledger(&self, id: NodeId) -> Result<VersionLedger> {
        let index = self.node_index(id)?;
        Ok(VersionLedger::from_node(&self.nodes[index]))
    }

    /// Run a closure against a node's ledger and write the result back
    ///
    /// The ledger is only written back when the closure succeeds.
    pub fn with_ledger<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut VersionLedger) -> Result<R>,
    ) -> Result<R> {
        let index = self.node_index(id)?;
        let mut ledger = VersionLedger::from_node(&self.nodes[index]);
        let out = f(&mut ledger)?;
        ledger.apply_to(&mut self.nodes[index]);
        Ok(out)
    }

    /// Produce the serializable form of the whole graph
    pub fn export(&self) -> GraphExport {
        GraphExport {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Pretty-printed JSON export
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Atomically replace the store's contents
    ///
    /// The whole import is validated first; on any failure the store is
    /// left exactly as it was.
    pub fn import(&mut self, blob: GraphExport) -> Result<()> {
        for (i, node) in blob.nodes.iter().enumerate() {
            if blob.nodes[..i].iter().any(|n| n.id == node.id) {
                return Err(Error::Import(format!("duplicate node id: {}", node.id)));
            }
            if node.label.trim().is_empty() {
                return Err(Error::Import(format!("node {} has an empty label", node.id)));
            }
            for (j, version) in node.dataset_versions.iter().enumerate() {
                if node.dataset_versions[..j].iter().any(|v| v.id == version.id) {
                    return Err(Error::Import(format!(
                        "node {} has duplicate version id {}",
                        node.id, version.id
                    )));
                }
            }
            if let Some(ref current) = node.current_version_id {
                if !node.dataset_versions.iter().any(|v| v.id == *current) {
                    return Err(Error::Import(format!(
                        "node {} points at unknown version {current}",
                        node.id
                    )));
                }
            }
        }
        for edge in &blob.edges {
            for endpoint in [edge.from, edge.to] {
                if !blob.nodes.iter().any(|n| n.id == endpoint) {
                    return Err(Error::Import(format!(
                        "edge references missing node {endpoint}"
                    )));
                }
            }
        }

        self.next_id = blob.nodes.iter().map(|n| n.id.0).max().unwrap_or(0) + 1;
        self.nodes = blob.nodes;
        self.edges = blob.edges;
        tracing::info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "imported graph"
        );
        Ok(())
    }

    /// Parse and import a JSON graph blob
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::Import(format!("malformed graph payload: {e}")))?;
        for key in ["nodes", "edges"] {
            if !value
                .get(key)
                .map(serde_json::Value::is_array)
                .unwrap_or(false)
            {
                return Err(Error::Import(format!("{key} must be an array")));
            }
        }
        let blob: GraphExport = serde_json::from_value(value)
            .map_err(|e| Error::Import(format!("malformed graph payload: {e}")))?;
        self.import(blob)
    }
}
