//! Path-check error types

use thiserror::Error;

/// Message shown when a path is not absolute, illustrating both forms
pub const ABSOLUTE_PATH_REQUIRED: &str =
    "Absolute path is required. Example: /home/user/file.txt or C:\\Users\\user\\file.txt";

/// Internal failures of the path-check boundary
///
/// These never cross the boundary as errors; `PathValidator`
/// implementations fold them into the response and log the reason.
#[derive(Error, Debug)]
pub enum PathCheckError {
    #[error("{ABSOLUTE_PATH_REQUIRED}")]
    NotAbsolute,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
