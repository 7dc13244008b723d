//! Wire types for the path-check boundary

use lineage_core::PathStatus;
use serde::{Deserialize, Serialize};

/// Where a path lives; only local paths are supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Local,
}

/// A request to check one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCheckRequest {
    pub path: String,
    #[serde(rename = "type")]
    pub storage_type: StorageType,
}

impl PathCheckRequest {
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            storage_type: StorageType::Local,
        }
    }
}

/// The boundary's answer
///
/// A well-formed absolute path that simply does not exist yields
/// `exists: false` with no error field; `error` is set only when
/// existence could not be determined (or the request was invalid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCheckResponse {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathCheckResponse {
    pub fn found() -> Self {
        Self {
            exists: true,
            error: None,
        }
    }

    pub fn missing() -> Self {
        Self {
            exists: false,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            exists: false,
            error: Some(reason.into()),
        }
    }
}

/// Map a response to the tri-state shown per path property
pub fn resolve_status(response: &PathCheckResponse) -> PathStatus {
    if response.exists && response.error.is_none() {
        PathStatus::Valid
    } else {
        PathStatus::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_type_field() {
        let request = PathCheckRequest::local("/data/in.csv");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "local");
        assert_eq!(json["path"], "/data/in.csv");
    }

    #[test]
    fn test_response_omits_absent_error() {
        let json = serde_json::to_value(PathCheckResponse::missing()).unwrap();
        assert_eq!(json, serde_json::json!({"exists": false}));
    }

    #[test]
    fn test_resolve_status() {
        assert_eq!(resolve_status(&PathCheckResponse::found()), PathStatus::Valid);
        assert_eq!(
            resolve_status(&PathCheckResponse::missing()),
            PathStatus::Invalid
        );
        assert_eq!(
            resolve_status(&PathCheckResponse::failed("denied")),
            PathStatus::Invalid
        );
    }
}
