//! Edit sessions: staged changes to one node
//!
//! A session works on a private copy of a node and its version ledger;
//! nothing reaches the shared store until `save`. The session also
//! tracks the tri-state check status of each path property, including
//! the stale-response rule: a check result for a superseded value must
//! never overwrite a reset.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeType};
use crate::store::GraphStore;
use crate::version::VersionLedger;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Displayed validation state of a single path property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl PathStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathStatus::Unknown => "unknown",
            PathStatus::Valid => "valid",
            PathStatus::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle for one in-flight path check
///
/// Captures which request was the newest for its key at issue time;
/// results carried by an outdated ticket are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCheckTicket {
    key: String,
    seq: u64,
}

impl PathCheckTicket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, Default)]
struct PathState {
    status: PathStatus,
    seq: u64,
}

/// A private, editable copy of one node
#[derive(Debug, Clone)]
pub struct EditSession {
    node: Node,
    ledger: VersionLedger,
    path_states: IndexMap<String, PathState>,
}

impl EditSession {
    /// Start a session from the store's current snapshot of `id`
    pub fn begin(store: &GraphStore, id: NodeId) -> Result<Self> {
        let node = store.node(id).ok_or(Error::NodeNotFound(id))?.clone();
        let ledger = VersionLedger::from_node(&node);
        let path_states = node
            .path_properties
            .keys()
            .map(|k| (k.clone(), PathState::default()))
            .collect();
        Ok(Self {
            node,
            ledger,
            path_states,
        })
    }

    /// The staged node (ledger fields as of session start)
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut VersionLedger {
        &mut self.ledger
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.node.label = label.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.node.description = description.into();
    }

    pub fn set_type(&mut self, node_type: NodeType) {
        self.node.node_type = node_type;
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.node.properties.insert(key.into(), value.into());
    }

    pub fn remove_property(&mut self, key: &str) -> bool {
        self.node.properties.shift_remove(key).is_some()
    }

    /// Set (or add) a path property, resetting its check status
    ///
    /// Any check still in flight for the old value becomes stale.
    pub fn set_path_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.node.path_properties.insert(key.clone(), value.into());
        self.reset_path_state(&key);
    }

    /// Rename a path property key, carrying the value over
    ///
    /// The renamed entry starts over at `Unknown`.
    pub fn rename_path_property(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        if new.trim().is_empty() {
            return Err(Error::Validation(
                "path property key must not be empty".to_string(),
            ));
        }
        if self.node.path_properties.contains_key(&new) {
            return Err(Error::Validation(format!(
                "path property {new} already exists"
            )));
        }
        let value = self
            .node
            .path_properties
            .shift_remove(old)
            .ok_or_else(|| Error::Validation(format!("no path property named {old}")))?;

        self.node.path_properties.insert(new.clone(), value);
        // old in-flight checks must not land on the renamed entry
        let seq = self.path_states.shift_remove(old).map(|s| s.seq).unwrap_or(0);
        self.path_states.insert(
            new,
            PathState {
                status: PathStatus::Unknown,
                seq: seq + 1,
            },
        );
        Ok(())
    }

    pub fn remove_path_property(&mut self, key: &str) -> bool {
        self.path_states.shift_remove(key);
        self.node.path_properties.shift_remove(key).is_some()
    }

    /// Displayed status for a path property key
    pub fn path_status(&self, key: &str) -> PathStatus {
        self.path_states
            .get(key)
            .map(|s| s.status)
            .unwrap_or_default()
    }

    /// Current value of a path property
    pub fn path_property(&self, key: &str) -> Option<&str> {
        self.node.path_properties.get(key).map(String::as_str)
    }

    /// Begin a check for a key, superseding any earlier check
    ///
    /// Returns `None` for a key with no path property.
    pub fn begin_path_check(&mut self, key: &str) -> Option<PathCheckTicket> {
        if !self.node.path_properties.contains_key(key) {
            return None;
        }
        let state = self.path_states.entry(key.to_string()).or_default();
        state.seq += 1;
        Some(PathCheckTicket {
            key: key.to_string(),
            seq: state.seq,
        })
    }

    /// Record the result of a check
    ///
    /// Returns false (and changes nothing) if the ticket has been
    /// superseded by a later check or an edit to the entry.
    pub fn record_path_check(&mut self, ticket: &PathCheckTicket, status: PathStatus) -> bool {
        match self.path_states.get_mut(&ticket.key) {
            Some(state) if state.seq == ticket.seq => {
                state.status = status;
                true
            }
            _ => {
                tracing::debug!(key = %ticket.key, "discarded stale path check result");
                false
            }
        }
    }

    fn reset_path_state(&mut self, key: &str) {
        let state = self.path_states.entry(key.to_string()).or_default();
        state.status = PathStatus::Unknown;
        state.seq += 1;
    }

    /// Merge the staged copy back into the store
    ///
    /// An empty label blocks the save and the store stays untouched.
    pub fn save(&self, store: &mut GraphStore) -> Result<Node> {
        let mut node = self.node.clone();
        self.ledger.apply_to(&mut node);
        let saved = store.replace_node(node)?.clone();
        tracing::debug!(node = %saved.id, "saved edit session");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NewNode;

    fn store_with_source() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .add_node(
                NewNode::new("raw_events")
                    .with_type(NodeType::Source)
                    .with_path_property("input", "/data/in.csv"),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_edits_stay_private_until_save() {
        let mut store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        session.set_description("landing table");
        session.set_property("format", "csv");
        assert_eq!(store.node(NodeId(1)).unwrap().description, "");

        session.save(&mut store).unwrap();
        let node = store.node(NodeId(1)).unwrap();
        assert_eq!(node.description, "landing table");
        assert_eq!(node.properties.get("format").unwrap(), "csv");
    }

    #[test]
    fn test_save_carries_property_deletions() {
        let mut store = store_with_source();
        store
            .update_node(NodeId(1), crate::node::NodePatch::new().set_property("keep", "1"))
            .unwrap();
        store
            .update_node(NodeId(1), crate::node::NodePatch::new().set_property("drop", "2"))
            .unwrap();

        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();
        session.remove_property("drop");
        session.save(&mut store).unwrap();

        let node = store.node(NodeId(1)).unwrap();
        assert!(node.properties.contains_key("keep"));
        assert!(!node.properties.contains_key("drop"));
    }

    #[test]
    fn test_empty_label_blocks_save() {
        let mut store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        session.set_label("");
        assert!(matches!(
            session.save(&mut store),
            Err(Error::Validation(_))
        ));
        assert_eq!(store.node(NodeId(1)).unwrap().label, "raw_events");
    }

    #[test]
    fn test_ledger_merges_on_save() {
        let mut store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        let id = session
            .ledger_mut()
            .create("/data/v1.csv", "first", None)
            .id
            .clone();
        assert!(store.node(NodeId(1)).unwrap().dataset_versions.is_empty());

        session.save(&mut store).unwrap();
        let node = store.node(NodeId(1)).unwrap();
        assert_eq!(node.dataset_versions.len(), 1);
        assert_eq!(node.current_version_id, Some(id));
    }

    #[test]
    fn test_path_status_starts_unknown() {
        let store = store_with_source();
        let session = EditSession::begin(&store, NodeId(1)).unwrap();

        assert_eq!(session.path_status("input"), PathStatus::Unknown);
        assert_eq!(session.path_status("missing"), PathStatus::Unknown);
    }

    #[test]
    fn test_check_result_applies_when_current() {
        let mut store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        let ticket = session.begin_path_check("input").unwrap();
        assert!(session.record_path_check(&ticket, PathStatus::Valid));
        assert_eq!(session.path_status("input"), PathStatus::Valid);
        store.nodes(); // store untouched by checks
    }

    #[test]
    fn test_edit_resets_status_and_supersedes_inflight_check() {
        let mut store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        let ticket = session.begin_path_check("input").unwrap();
        assert!(session.record_path_check(&ticket, PathStatus::Valid));

        // edit the value while another check is in flight
        let inflight = session.begin_path_check("input").unwrap();
        session.set_path_property("input", "/data/other.csv");
        assert_eq!(session.path_status("input"), PathStatus::Unknown);

        // the late result for the superseded value is discarded
        assert!(!session.record_path_check(&inflight, PathStatus::Valid));
        assert_eq!(session.path_status("input"), PathStatus::Unknown);
        let _ = store.node(NodeId(1));
    }

    #[test]
    fn test_newer_check_supersedes_older_one() {
        let store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        let older = session.begin_path_check("input").unwrap();
        let newer = session.begin_path_check("input").unwrap();

        assert!(!session.record_path_check(&older, PathStatus::Invalid));
        assert!(session.record_path_check(&newer, PathStatus::Valid));
        assert_eq!(session.path_status("input"), PathStatus::Valid);
    }

    #[test]
    fn test_rename_resets_status() {
        let store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();

        let ticket = session.begin_path_check("input").unwrap();
        assert!(session.record_path_check(&ticket, PathStatus::Valid));

        session.rename_path_property("input", "source_file").unwrap();
        assert_eq!(session.path_status("source_file"), PathStatus::Unknown);
        assert_eq!(session.path_property("source_file"), Some("/data/in.csv"));
        assert!(session.path_property("input").is_none());

        assert!(session.rename_path_property("missing", "x").is_err());
        assert!(session.rename_path_property("source_file", "").is_err());
    }

    #[test]
    fn test_begin_check_for_unknown_key() {
        let store = store_with_source();
        let mut session = EditSession::begin(&store, NodeId(1)).unwrap();
        assert!(session.begin_path_check("nope").is_none());
    }
}
