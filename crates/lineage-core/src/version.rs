//! Dataset versions and the per-node version ledger

use crate::error::{Error, Result};
use crate::node::Node;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a dataset version within one ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionId(pub Uuid);

impl VersionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VersionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VersionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Optional descriptive metadata for a dataset version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Extensible metadata beyond the well-known fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl VersionMetadata {
    pub fn is_empty(&self) -> bool {
        self.size.is_none()
            && self.row_count.is_none()
            && self.columns.is_none()
            && self.extra.is_empty()
    }
}

/// A single dataset version
///
/// Versions are immutable once created; only the ledger's current
/// pointer moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: VersionId,
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub description: String,
    #[serde(default)]
    pub metadata: Option<VersionMetadata>,
}

impl Version {
    /// Create a version with a fresh id and the current time
    pub fn new(
        path: impl Into<String>,
        description: impl Into<String>,
        metadata: Option<VersionMetadata>,
    ) -> Self {
        Self {
            id: VersionId::new(),
            timestamp: Utc::now(),
            path: path.into(),
            description: description.into(),
            metadata,
        }
    }
}

/// Serialized form of a ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerExport {
    pub versions: Vec<Version>,
    #[serde(default)]
    pub current_version: Option<VersionId>,
}

/// Ordered list of dataset versions plus the current-version pointer
///
/// Recency is defined by append order in the list, never by comparing
/// timestamps; imports may reorder entries and the "last" version is
/// still the last list element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionLedger {
    versions: Vec<Version>,
    current: Option<VersionId>,
}

impl VersionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a detached ledger from a node's version fields
    pub fn from_node(node: &Node) -> Self {
        Self {
            versions: node.dataset_versions.clone(),
            current: node.current_version_id.clone(),
        }
    }

    /// Write this ledger back into a node's version fields
    pub fn apply_to(&self, node: &mut Node) {
        node.dataset_versions = self.versions.clone();
        node.current_version_id = self.current.clone();
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, id: &VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == *id)
    }

    pub fn current_id(&self) -> Option<&VersionId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Version> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Append a new version and make it current
    ///
    /// The same path may recur across versions.
    pub fn create(
        &mut self,
        path: impl Into<String>,
        description: impl Into<String>,
        metadata: Option<VersionMetadata>,
    ) -> &Version {
        let version = Version::new(path, description, metadata);
        tracing::debug!(version = %version.id, path = %version.path, "created dataset version");

        self.current = Some(version.id.clone());
        self.versions.push(version);
        let index = self.versions.len() - 1;
        &self.versions[index]
    }

    /// Move the current pointer to an existing version
    pub fn switch(&mut self, id: &VersionId) -> Result<&Version> {
        if self.get(id).is_none() {
            return Err(Error::VersionNotFound(id.to_string()));
        }
        self.current = Some(id.clone());
        tracing::debug!(version = %id, "switched current version");
        self.get(id)
            .ok_or_else(|| Error::VersionNotFound(id.to_string()))
    }

    /// Remove a version
    ///
    /// If the removed entry was current, the pointer moves to the last
    /// remaining entry in list order, or becomes unset when the ledger
    /// is empty.
    pub fn delete(&mut self, id: &VersionId) -> Result<Version> {
        let pos = self
            .versions
            .iter()
            .position(|v| v.id == *id)
            .ok_or_else(|| Error::VersionNotFound(id.to_string()))?;

        let removed = self.versions.remove(pos);
        if self.current.as_ref() == Some(id) {
            self.current = self.versions.last().map(|v| v.id.clone());
        }
        tracing::debug!(version = %id, remaining = self.versions.len(), "deleted dataset version");
        Ok(removed)
    }

    /// Produce the serializable form of this ledger
    pub fn export(&self) -> LedgerExport {
        LedgerExport {
            versions: self.versions.clone(),
            current_version: self.current.clone(),
        }
    }

    /// Atomically replace the ledger's contents
    ///
    /// Nothing changes if validation fails.
    pub fn import(&mut self, blob: LedgerExport) -> Result<()> {
        for (i, version) in blob.versions.iter().enumerate() {
            if blob.versions[..i].iter().any(|v| v.id == version.id) {
                return Err(Error::Import(format!(
                    "duplicate version id: {}",
                    version.id
                )));
            }
        }
        if let Some(ref current) = blob.current_version {
            if !blob.versions.iter().any(|v| v.id == *current) {
                return Err(Error::Import(format!(
                    "currentVersion {current} does not name an imported version"
                )));
            }
        }

        self.versions = blob.versions;
        self.current = blob.current_version;
        tracing::info!(versions = self.versions.len(), "imported version ledger");
        Ok(())
    }

    /// Parse and import a JSON ledger blob
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::Import(format!("malformed ledger payload: {e}")))?;
        if !value
            .get("versions")
            .map(serde_json::Value::is_array)
            .unwrap_or(false)
        {
            return Err(Error::Import("versions must be an array".to_string()));
        }
        let blob: LedgerExport = serde_json::from_value(value)
            .map_err(|e| Error::Import(format!("malformed ledger payload: {e}")))?;
        self.import(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(n: usize) -> VersionLedger {
        let mut ledger = VersionLedger::new();
        for i in 0..n {
            ledger.create(format!("/data/v{i}.csv"), format!("rev {i}"), None);
        }
        ledger
    }

    #[test]
    fn test_create_appends_and_points() {
        let mut ledger = VersionLedger::new();
        let id = ledger.create("/data/a.csv", "first", None).id.clone();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.current_id(), Some(&id));

        let second = ledger.create("/data/a.csv", "same path again", None).id.clone();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.current_id(), Some(&second));
    }

    #[test]
    fn test_switch_moves_pointer() {
        let mut ledger = ledger_with(3);
        let first = ledger.versions()[0].id.clone();

        let switched = ledger.switch(&first).unwrap().id.clone();
        assert_eq!(switched, first);
        assert_eq!(ledger.current_id(), Some(&first));

        let missing = VersionId::new();
        assert!(matches!(
            ledger.switch(&missing),
            Err(Error::VersionNotFound(_))
        ));
        // failed switch leaves the pointer alone
        assert_eq!(ledger.current_id(), Some(&first));
    }

    #[test]
    fn test_delete_current_reassigns_to_last_in_list_order() {
        let mut ledger = ledger_with(3);
        let ids: Vec<_> = ledger.versions().iter().map(|v| v.id.clone()).collect();

        // point at the middle entry, then delete it
        ledger.switch(&ids[1]).unwrap();
        ledger.delete(&ids[1]).unwrap();

        // pointer goes to the last remaining entry, not the previous one
        assert_eq!(ledger.current_id(), Some(&ids[2]));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_delete_noncurrent_keeps_pointer() {
        let mut ledger = ledger_with(3);
        let ids: Vec<_> = ledger.versions().iter().map(|v| v.id.clone()).collect();

        ledger.delete(&ids[0]).unwrap();
        assert_eq!(ledger.current_id(), Some(&ids[2]));
    }

    #[test]
    fn test_delete_last_unsets_pointer() {
        let mut ledger = ledger_with(1);
        let id = ledger.versions()[0].id.clone();

        ledger.delete(&id).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.current_id().is_none());

        assert!(matches!(
            ledger.delete(&id),
            Err(Error::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut ledger = ledger_with(2);
        let first = ledger.versions()[0].id.clone();
        ledger.switch(&first).unwrap();

        let json = serde_json::to_string(&ledger.export()).unwrap();
        let mut restored = VersionLedger::new();
        restored.import_json(&json).unwrap();

        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_import_rejects_bad_shapes() {
        let mut ledger = ledger_with(2);
        let before = ledger.clone();

        assert!(matches!(
            ledger.import_json("not json"),
            Err(Error::Import(_))
        ));
        assert!(matches!(
            ledger.import_json(r#"{"versions": 42}"#),
            Err(Error::Import(_))
        ));
        assert!(matches!(
            ledger.import_json(r#"{"currentVersion": null}"#),
            Err(Error::Import(_))
        ));

        // a dangling pointer rejects the whole import
        let blob = LedgerExport {
            versions: vec![],
            current_version: Some(VersionId::new()),
        };
        assert!(matches!(ledger.import(blob), Err(Error::Import(_))));

        // failed imports leave prior state untouched
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_metadata_round_trip() {
        let metadata = VersionMetadata {
            size: Some(1024),
            row_count: Some(50),
            columns: Some(vec!["id".to_string(), "value".to_string()]),
            extra: [("checksum".to_string(), serde_json::json!("abc123"))]
                .into_iter()
                .collect(),
        };
        let version = Version::new("/data/v1.parquet", "with metadata", Some(metadata));

        let json = serde_json::to_value(&version).unwrap();
        assert_eq!(json["metadata"]["rowCount"], 50);
        assert_eq!(json["metadata"]["checksum"], "abc123");

        let back: Version = serde_json::from_value(json).unwrap();
        assert_eq!(back, version);
    }
}
