//! Lineage Core - In-memory lineage graph engine
//!
//! This crate provides the data model and the stateful engines of the
//! Lineage pipeline editor: the graph store (nodes and edges with
//! atomic import/export), the per-source-node dataset version ledger,
//! the whole-graph snapshot history, and the edit session that stages
//! changes before merging them back.

pub mod command;
pub mod edge;
pub mod error;
pub mod history;
pub mod node;
pub mod session;
pub mod store;
pub mod version;

pub use command::{Command, CommandOutcome};
pub use edge::{Edge, EdgeId};
pub use error::{Error, Result};
pub use history::{GraphHistory, HistoryExport, Snapshot, SnapshotId};
pub use node::{NewNode, Node, NodeId, NodePatch, NodeType};
pub use session::{EditSession, PathCheckTicket, PathStatus};
pub use store::{GraphExport, GraphStore};
pub use version::{LedgerExport, Version, VersionId, VersionLedger, VersionMetadata};
