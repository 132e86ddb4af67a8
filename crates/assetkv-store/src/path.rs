//! Store path normalization.
//!
//! Paths are `/`-separated, relative to the store root. A single leading
//! or trailing `/` is ignored; the empty path addresses the root.

use crate::error::{StoreError, StoreResult};

/// Normalize `path` into its canonical relative form.
///
/// Rejects empty, `.` and `..` segments, backslashes and NUL bytes so a path
/// can never address anything outside the store root.
pub fn normalize_path(path: &str) -> StoreResult<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.contains('\0') {
        return Err(StoreError::invalid_path(path, "contains NUL byte"));
    }
    if trimmed.contains('\\') {
        return Err(StoreError::invalid_path(path, "contains backslash"));
    }
    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(StoreError::invalid_path(path, "empty path segment")),
            "." | ".." => {
                return Err(StoreError::invalid_path(path, "relative path segment"))
            }
            _ => {}
        }
    }
    Ok(trimmed.to_string())
}

/// Join a directory path and a child name with `/`, without a leading slash
/// when `dir` is the root.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
