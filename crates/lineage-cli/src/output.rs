//! Output formatting utilities

use lineage_core::{Edge, Node, Snapshot, SnapshotId, Version};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Serialize to pretty JSON, for `--format json`
pub fn to_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Render nodes as an aligned table
pub fn node_table(nodes: &[&Node]) -> String {
    let mut out = format!(
        "{:<6} {:<24} {:<10} {:<8} {}\n",
        "ID", "LABEL", "TYPE", "VERSIONS", "DESCRIPTION"
    );
    for node in nodes {
        out.push_str(&format!(
            "{:<6} {:<24} {:<10} {:<8} {}\n",
            node.id.to_string(),
            node.label,
            node.node_type.as_str(),
            node.dataset_versions.len(),
            node.description
        ));
    }
    out
}

/// Render edges as an aligned table
pub fn edge_table(edges: &[Edge]) -> String {
    let mut out = format!("{:<38} {:>6} {:>6}\n", "ID", "FROM", "TO");
    for edge in edges {
        out.push_str(&format!(
            "{:<38} {:>6} {:>6}\n",
            edge.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            edge.from.to_string(),
            edge.to.to_string()
        ));
    }
    out
}

/// Render versions as an aligned table, marking the current one
pub fn version_table(versions: &[Version], current: Option<&lineage_core::VersionId>) -> String {
    let mut out = format!(
        "  {:<38} {:<22} {:<32} {}\n",
        "ID", "TIMESTAMP", "PATH", "DESCRIPTION"
    );
    for version in versions {
        let marker = if Some(&version.id) == current { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<38} {:<22} {:<32} {}\n",
            version.id.to_string(),
            version.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            version.path,
            version.description
        ));
    }
    out
}

/// Render graph snapshots as an aligned table, marking the current one
pub fn snapshot_table(snapshots: &[Snapshot], current: Option<&SnapshotId>) -> String {
    let mut out = format!(
        "  {:<38} {:<22} {:<16} {:<8} {}\n",
        "ID", "TIMESTAMP", "AUTHOR", "NODES", "DESCRIPTION"
    );
    for snapshot in snapshots {
        let marker = if Some(&snapshot.id) == current { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<38} {:<22} {:<16} {:<8} {}\n",
            snapshot.id.to_string(),
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            snapshot.author,
            snapshot.data.nodes.len(),
            snapshot.description
        ));
    }
    out
}
