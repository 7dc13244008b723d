//! Local-filesystem path checker

use crate::error::PathCheckError;
use crate::traits::PathValidator;
use crate::types::{PathCheckRequest, PathCheckResponse};
use async_trait::async_trait;

/// True for POSIX (`/home/user/file.txt`), Windows drive
/// (`C:\Users\user\file.txt`, `C:/Users/user/file.txt`) and UNC
/// (`\\server\share`) absolute forms, regardless of host platform.
pub fn is_absolute_path(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with("\\\\") {
        return true;
    }
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some('\\' | '/')) if drive.is_ascii_alphabetic()
    )
}

/// Path checker backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPathChecker;

impl LocalPathChecker {
    pub fn new() -> Self {
        Self
    }
}

async fn path_exists(path: &str) -> Result<bool, PathCheckError> {
    if !is_absolute_path(path) {
        return Err(PathCheckError::NotAbsolute);
    }
    Ok(tokio::fs::try_exists(path).await?)
}

#[async_trait]
impl PathValidator for LocalPathChecker {
    async fn check_path(&self, request: &PathCheckRequest) -> PathCheckResponse {
        match path_exists(&request.path).await {
            Ok(true) => {
                tracing::debug!(path = %request.path, "path exists");
                PathCheckResponse::found()
            }
            Ok(false) => {
                tracing::debug!(path = %request.path, "path does not exist");
                PathCheckResponse::missing()
            }
            Err(e) => {
                tracing::warn!(path = %request.path, error = %e, "path check failed");
                PathCheckResponse::failed(e.to_string())
            }
        }
    }
}
