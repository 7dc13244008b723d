//! Whole-graph snapshot history
//!
//! Orthogonal to the per-node dataset ledger: a snapshot captures the
//! entire `{nodes, edges}` graph at a point in time, so an earlier
//! state of the whole pipeline can be restored. Snapshots are
//! immutable once taken; only the current pointer moves.

use crate::error::{Error, Result};
use crate::store::GraphExport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default author recorded on a snapshot when none is given
// TODO: take the author from a user identity once the CLI has one
pub const DEFAULT_AUTHOR: &str = "Current User";

/// Unique identifier for a graph snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SnapshotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One captured state of the whole graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: SnapshotId,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub data: GraphExport,
    pub author: String,
}

impl Snapshot {
    /// Capture a graph state with a fresh id and the current time
    pub fn new(data: GraphExport, description: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: SnapshotId::new(),
            timestamp: Utc::now(),
            description: description.into(),
            data,
            author: author.into(),
        }
    }
}

/// Serialized form of a snapshot history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub versions: Vec<Snapshot>,
    #[serde(default)]
    pub current_version: Option<SnapshotId>,
}

/// Ordered list of graph snapshots plus the current-snapshot pointer
///
/// Recency is append order, as in the dataset ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphHistory {
    snapshots: Vec<Snapshot>,
    current: Option<SnapshotId>,
}

impl GraphHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, id: &SnapshotId) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == *id)
    }

    pub fn current_id(&self) -> Option<&SnapshotId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Append a new snapshot and make it current
    pub fn create(
        &mut self,
        data: GraphExport,
        description: impl Into<String>,
        author: impl Into<String>,
    ) -> &Snapshot {
        let snapshot = Snapshot::new(data, description, author);
        tracing::debug!(snapshot = %snapshot.id, "created graph snapshot");

        self.current = Some(snapshot.id.clone());
        self.snapshots.push(snapshot);
        let index = self.snapshots.len() - 1;
        &self.snapshots[index]
    }

    /// Move the current pointer to an existing snapshot
    ///
    /// Returns the snapshot so the caller can restore its graph data.
    pub fn switch(&mut self, id: &SnapshotId) -> Result<&Snapshot> {
        if self.get(id).is_none() {
            return Err(Error::VersionNotFound(id.to_string()));
        }
        self.current = Some(id.clone());
        tracing::debug!(snapshot = %id, "switched current snapshot");
        self.get(id)
            .ok_or_else(|| Error::VersionNotFound(id.to_string()))
    }

    /// Produce the serializable form of this history
    pub fn export(&self) -> HistoryExport {
        HistoryExport {
            versions: self.snapshots.clone(),
            current_version: self.current.clone(),
        }
    }

    /// Atomically replace the history's contents
    ///
    /// Nothing changes if validation fails.
    pub fn import(&mut self, blob: HistoryExport) -> Result<()> {
        for (i, snapshot) in blob.versions.iter().enumerate() {
            if blob.versions[..i].iter().any(|s| s.id == snapshot.id) {
                return Err(Error::Import(format!(
                    "duplicate snapshot id: {}",
                    snapshot.id
                )));
            }
        }
        if let Some(ref current) = blob.current_version {
            if !blob.versions.iter().any(|s| s.id == *current) {
                return Err(Error::Import(format!(
                    "currentVersion {current} does not name an imported snapshot"
                )));
            }
        }

        self.snapshots = blob.versions;
        self.current = blob.current_version;
        tracing::info!(snapshots = self.snapshots.len(), "imported graph history");
        Ok(())
    }

    /// Parse and import a JSON history blob
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::Import(format!("malformed history payload: {e}")))?;
        if !value
            .get("versions")
            .map(serde_json::Value::is_array)
            .unwrap_or(false)
        {
            return Err(Error::Import("versions must be an array".to_string()));
        }
        let blob: HistoryExport = serde_json::from_value(value)
            .map_err(|e| Error::Import(format!("malformed history payload: {e}")))?;
        self.import(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NewNode;
    use crate::store::GraphStore;

    fn store_with(labels: &[&str]) -> GraphStore {
        let mut store = GraphStore::new();
        for label in labels {
            store.add_node(NewNode::new(*label)).unwrap();
        }
        store
    }

    #[test]
    fn test_create_appends_and_points() {
        let mut history = GraphHistory::new();

        let first = history
            .create(store_with(&["a"]).export(), "one node", DEFAULT_AUTHOR)
            .id
            .clone();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_id(), Some(&first));

        let second = history
            .create(store_with(&["a", "b"]).export(), "two nodes", "alice")
            .id
            .clone();
        assert_eq!(history.current_id(), Some(&second));
        assert_eq!(history.current().unwrap().author, "alice");
    }

    #[test]
    fn test_switch_returns_restorable_data() {
        let mut history = GraphHistory::new();
        let old_export = store_with(&["a"]).export();
        let old = history.create(old_export.clone(), "before", DEFAULT_AUTHOR).id.clone();
        history.create(store_with(&["a", "b"]).export(), "after", DEFAULT_AUTHOR);

        let snapshot = history.switch(&old).unwrap().clone();
        assert_eq!(snapshot.data, old_export);
        assert_eq!(history.current_id(), Some(&old));

        // restoring the snapshot rebuilds the earlier graph
        let mut restored = GraphStore::new();
        restored.import(snapshot.data.clone()).unwrap();
        assert_eq!(restored.nodes().len(), 1);
    }

    #[test]
    fn test_switch_to_missing_snapshot() {
        let mut history = GraphHistory::new();
        history.create(store_with(&["a"]).export(), "only", DEFAULT_AUTHOR);
        let before = history.current_id().cloned();

        assert!(matches!(
            history.switch(&SnapshotId::new()),
            Err(Error::VersionNotFound(_))
        ));
        assert_eq!(history.current_id(), before.as_ref());
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut history = GraphHistory::new();
        let first = history
            .create(store_with(&["a"]).export(), "first", DEFAULT_AUTHOR)
            .id
            .clone();
        history.create(store_with(&["a", "b"]).export(), "second", DEFAULT_AUTHOR);
        history.switch(&first).unwrap();

        let json = serde_json::to_string(&history.export()).unwrap();
        let mut restored = GraphHistory::new();
        restored.import_json(&json).unwrap();

        assert_eq!(restored, history);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = Snapshot::new(store_with(&["a"]).export(), "desc", DEFAULT_AUTHOR);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert!(json["data"]["nodes"].is_array());
        assert!(json["data"]["edges"].is_array());
        assert_eq!(json["author"], DEFAULT_AUTHOR);
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_import_rejects_bad_shapes_atomically() {
        let mut history = GraphHistory::new();
        history.create(store_with(&["a"]).export(), "kept", DEFAULT_AUTHOR);
        let before = history.clone();

        assert!(matches!(
            history.import_json("not json"),
            Err(Error::Import(_))
        ));
        assert!(matches!(
            history.import_json(r#"{"versions": 42}"#),
            Err(Error::Import(_))
        ));

        let blob = HistoryExport {
            versions: vec![],
            current_version: Some(SnapshotId::new()),
        };
        assert!(matches!(history.import(blob), Err(Error::Import(_))));

        assert_eq!(history, before);
    }
}
