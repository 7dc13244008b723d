//! Typed commands over the graph store
//!
//! The UI layer (or the CLI) emits these instead of wiring callbacks
//! into the store; `GraphStore::apply` reduces a command plus current
//! state into new state with no embedded side effects, so the core is
//! testable without any rendering surface.

use crate::edge::{Edge, EdgeId};
use crate::error::Result;
use crate::node::{NewNode, Node, NodeId, NodePatch};
use crate::store::GraphStore;
use crate::version::{Version, VersionId, VersionMetadata};
use serde::{Deserialize, Serialize};

/// An intent to change the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    AddNode {
        draft: NewNode,
    },
    UpdateNode {
        id: NodeId,
        patch: NodePatch,
    },
    DeleteNode {
        id: NodeId,
    },
    AddEdge {
        from: NodeId,
        to: NodeId,
    },
    DeleteEdge {
        id: EdgeId,
    },
    CreateVersion {
        node: NodeId,
        path: String,
        description: String,
        #[serde(default)]
        metadata: Option<VersionMetadata>,
    },
    SwitchVersion {
        node: NodeId,
        version: VersionId,
    },
    DeleteVersion {
        node: NodeId,
        version: VersionId,
    },
    ImportGraph {
        blob: String,
    },
}

/// What a successfully applied command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    NodeAdded(Node),
    NodeUpdated(Node),
    NodeDeleted(Node),
    EdgeAdded(Edge),
    EdgeDeleted(Edge),
    VersionCreated(Version),
    VersionSwitched(Version),
    VersionDeleted(Version),
    GraphImported { nodes: usize, edges: usize },
}

impl GraphStore {
    /// Reduce a command against the current state
    ///
    /// A failed command leaves the store untouched.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::AddNode { draft } => {
                let node = self.add_node(draft)?.clone();
                Ok(CommandOutcome::NodeAdded(node))
            }
            Command::UpdateNode { id, patch } => {
                let node = self.update_node(id, patch)?.clone();
                Ok(CommandOutcome::NodeUpdated(node))
            }
            Command::DeleteNode { id } => Ok(CommandOutcome::NodeDeleted(self.delete_node(id)?)),
            Command::AddEdge { from, to } => {
                let edge = self.add_edge(from, to)?.clone();
                Ok(CommandOutcome::EdgeAdded(edge))
            }
            Command::DeleteEdge { id } => Ok(CommandOutcome::EdgeDeleted(self.delete_edge(&id)?)),
            Command::CreateVersion {
                node,
                path,
                description,
                metadata,
            } => {
                let version = self.with_ledger(node, |ledger| {
                    Ok(ledger.create(path, description, metadata).clone())
                })?;
                Ok(CommandOutcome::VersionCreated(version))
            }
            Command::SwitchVersion { node, version } => {
                let version =
                    self.with_ledger(node, |ledger| Ok(ledger.switch(&version)?.clone()))?;
                Ok(CommandOutcome::VersionSwitched(version))
            }
            Command::DeleteVersion { node, version } => {
                let version = self.with_ledger(node, |ledger| ledger.delete(&version))?;
                Ok(CommandOutcome::VersionDeleted(version))
            }
            Command::ImportGraph { blob } => {
                self.import_json(&blob)?;
                Ok(CommandOutcome::GraphImported {
                    nodes: self.nodes().len(),
                    edges: self.edges().len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::node::NodeType;

    #[test]
    fn test_apply_node_and_edge_commands() {
        let mut store = GraphStore::new();

        let outcome = store
            .apply(Command::AddNode {
                draft: NewNode::new("raw").with_type(NodeType::Source),
            })
            .unwrap();
        let CommandOutcome::NodeAdded(node) = outcome else {
            panic!("expected NodeAdded");
        };
        assert_eq!(node.node_type, NodeType::Source);

        store
            .apply(Command::AddNode {
                draft: NewNode::new("out"),
            })
            .unwrap();
        let outcome = store
            .apply(Command::AddEdge {
                from: node.id,
                to: NodeId(2),
            })
            .unwrap();
        assert!(matches!(outcome, CommandOutcome::EdgeAdded(_)));

        store.apply(Command::DeleteNode { id: NodeId(2) }).unwrap();
        assert!(store.edges().is_empty());
    }

    #[test]
    fn test_apply_version_commands() {
        let mut store = GraphStore::new();
        store
            .apply(Command::AddNode {
                draft: NewNode::new("raw").with_type(NodeType::Source),
            })
            .unwrap();

        let outcome = store
            .apply(Command::CreateVersion {
                node: NodeId(1),
                path: "/data/v1.csv".to_string(),
                description: "initial".to_string(),
                metadata: None,
            })
            .unwrap();
        let CommandOutcome::VersionCreated(version) = outcome else {
            panic!("expected VersionCreated");
        };

        let node = store.node(NodeId(1)).unwrap();
        assert_eq!(node.dataset_versions.len(), 1);
        assert_eq!(node.current_version_id, Some(version.id.clone()));

        store
            .apply(Command::DeleteVersion {
                node: NodeId(1),
                version: version.id,
            })
            .unwrap();
        let node = store.node(NodeId(1)).unwrap();
        assert!(node.dataset_versions.is_empty());
        assert!(node.current_version_id.is_none());
    }

    #[test]
    fn test_failed_command_leaves_store_untouched() {
        let mut store = GraphStore::new();
        store
            .apply(Command::AddNode {
                draft: NewNode::new("only"),
            })
            .unwrap();
        let before = store.export();

        assert!(matches!(
            store.apply(Command::AddEdge {
                from: NodeId(1),
                to: NodeId(9),
            }),
            Err(Error::NodeNotFound(NodeId(9)))
        ));
        assert!(matches!(
            store.apply(Command::SwitchVersion {
                node: NodeId(1),
                version: VersionId::new(),
            }),
            Err(Error::VersionNotFound(_))
        ));
        assert_eq!(store.export(), before);
    }

    #[test]
    fn test_commands_round_trip_through_serde() {
        let command = Command::CreateVersion {
            node: NodeId(3),
            path: "/data/v2.csv".to_string(),
            description: "nightly".to_string(),
            metadata: None,
        };

        let json = serde_json::to_string(&command).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, Command::CreateVersion { node, .. } if node == NodeId(3)));
    }
}
