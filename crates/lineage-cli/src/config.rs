//! CLI configuration

use std::path::PathBuf;

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lineage")
}

/// Default location of the graph file
pub fn default_graph_file() -> PathBuf {
    default_data_dir().join("graph.json")
}
