//! The filter engine: pure functions over a graph snapshot

use crate::query::FilterQuery;
use lineage_core::{Node, NodeId};
use std::collections::BTreeSet;

/// Collect the property keys available for filtering
///
/// Returns the lexicographically sorted union of every property-map
/// key observed across `nodes` and the keys already selected in active
/// filters, so a selected key stays offered even when no node exposes
/// it anymore.
pub fn discover_properties(nodes: &[Node], active_filter_keys: &[String]) -> Vec<String> {
    let mut keys: BTreeSet<String> = nodes
        .iter()
        .flat_map(|n| n.properties.keys().cloned())
        .collect();
    keys.extend(
        active_filter_keys
            .iter()
            .filter(|k| !k.is_empty())
            .cloned(),
    );
    keys.into_iter().collect()
}

/// Evaluate a composite query against a snapshot
///
/// Each node is tested against the text, type and property predicates
/// combined by AND; ids of matching nodes are returned in the input
/// order. Deterministic, no mutation of `nodes`.
pub fn evaluate(nodes: &[Node], query: &FilterQuery) -> Vec<NodeId> {
    let matched: Vec<NodeId> = nodes
        .iter()
        .filter(|node| {
            matches_text(node, &query.text)
                && query.type_filter.matches(node.node_type)
                && matches_properties(node, query)
        })
        .map(|node| node.id)
        .collect();

    tracing::debug!(
        total = nodes.len(),
        matched = matched.len(),
        "evaluated filter query"
    );
    matched
}

fn matches_text(node: &Node, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    node.label.to_lowercase().contains(&term) || node.description.to_lowercase().contains(&term)
}

fn matches_properties(node: &Node, query: &FilterQuery) -> bool {
    query.property_filters.iter().all(|filter| {
        if filter.is_inert() {
            return true;
        }
        node.properties
            .get(&filter.key)
            .map(String::as_str)
            .unwrap_or("")
            .to_lowercase()
            .contains(&filter.value.to_lowercase())
    })
}
