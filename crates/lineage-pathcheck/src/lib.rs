//! Lineage Pathcheck - the path-existence boundary
//!
//! The core never touches the filesystem itself; it talks to a
//! `PathValidator` which takes `{ path, type }` requests and always
//! answers with a value, never an error. This crate provides the
//! boundary types, the trait, and the local-filesystem implementation.

pub mod error;
pub mod local;
pub mod traits;
pub mod types;

pub use error::PathCheckError;
pub use local::{is_absolute_path, LocalPathChecker};
pub use traits::PathValidator;
pub use types::{resolve_status, PathCheckRequest, PathCheckResponse, StorageType};
