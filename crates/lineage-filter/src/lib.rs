//! Lineage Filter - property discovery and composite queries
//!
//! Stateless, synchronous functions over a graph snapshot: discover
//! the property keys available for filtering, and evaluate a composite
//! query (text + type + property filters) to a set of node ids.

pub mod engine;
pub mod query;

pub use engine::{discover_properties, evaluate};
pub use query::{FilterQuery, PropertyFilter, TypeFilter};
