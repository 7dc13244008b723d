//! Query types for filtering the lineage graph

use lineage_core::NodeType;
use serde::{Deserialize, Serialize};

/// Node-type criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Source,
    Transform,
    Output,
}

impl TypeFilter {
    /// True if a node of `node_type` passes this criterion
    pub fn matches(&self, node_type: NodeType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Source => node_type == NodeType::Source,
            TypeFilter::Transform => node_type == NodeType::Transform,
            TypeFilter::Output => node_type == NodeType::Output,
        }
    }
}

impl From<NodeType> for TypeFilter {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Source => TypeFilter::Source,
            NodeType::Transform => TypeFilter::Transform,
            NodeType::Output => TypeFilter::Output,
        }
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "source" => Ok(TypeFilter::Source),
            "transform" => Ok(TypeFilter::Transform),
            "output" => Ok(TypeFilter::Output),
            other => Err(format!(
                "invalid type filter: {other} (expected all, source, transform or output)"
            )),
        }
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TypeFilter::All => "all",
            TypeFilter::Source => "source",
            TypeFilter::Transform => "transform",
            TypeFilter::Output => "output",
        };
        f.write_str(s)
    }
}

/// One (key, value) substring-match constraint
///
/// A filter whose key or value is empty is inert and matches every
/// node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub key: String,
    pub value: String,
}

impl PropertyFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.key.is_empty() || self.value.is_empty()
    }
}

/// Composite query: three independent predicates combined by AND
///
/// The default query is the identity query and matches every node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    /// Case-insensitive substring over label and description
    #[serde(default)]
    pub text: String,

    /// Node-type criterion
    #[serde(default, rename = "type")]
    pub type_filter: TypeFilter,

    /// Property constraints, all of which must hold
    #[serde(default)]
    pub property_filters: Vec<PropertyFilter>,
}

impl FilterQuery {
    /// Query matching nodes whose label or description contains `text`
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// The identity query
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn with_property_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.property_filters.push(PropertyFilter::new(key, value));
        self
    }

    /// Keys the user has already selected in this query
    pub fn active_keys(&self) -> Vec<String> {
        self.property_filters
            .iter()
            .filter(|f| !f.key.is_empty())
            .map(|f| f.key.clone())
            .collect()
    }
}
