//! Path validator trait definition

use crate::types::{PathCheckRequest, PathCheckResponse};
use async_trait::async_trait;

/// Trait for path-existence backends
///
/// Implementations always resolve to a response; a check that fails to
/// determine existence answers `{exists: false, error: Some(..)}` and
/// logs the reason rather than raising. Checks for different keys may
/// run concurrently and complete in any order; callers sequence the
/// results through the edit session's tickets.
#[async_trait]
pub trait PathValidator: Send + Sync {
    /// Check whether the requested path exists
    async fn check_path(&self, request: &PathCheckRequest) -> PathCheckResponse;
}
