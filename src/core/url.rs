// src/core/url.rs

//! Canonicalization of the URL fragments the gateway is mounted under, and
//! of the request paths below it.

use crate::core::errors::DavGateError;

/// The fixed suffix, below the root URL, where WebDAV is served.
pub const WEBDAV_SUFFIX: &str = "/api/webdav";

/// Produces a fragment with exactly one leading slash and no trailing slash.
/// The root (including the empty string) is returned as `"/"`.
pub fn normalize_url_fragment(url: &str) -> String {
    let trimmed = url.strip_prefix('/').unwrap_or(url);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let url = format!("/{trimmed}");
    match url.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => url,
    }
}

/// Like [`normalize_url_fragment`], but the root collapses to an empty
/// string so fragments can be concatenated without doubling slashes.
pub fn mount_fragment(url: &str) -> String {
    let normalized = normalize_url_fragment(url);
    if normalized == "/" {
        String::new()
    } else {
        normalized
    }
}

/// Canonicalizes a request path so rule evaluation and the filesystem see
/// the same string: repeated slashes collapse, `.` segments are dropped and
/// the result has exactly one leading slash. A trailing slash is kept.
///
/// `..`, backslashes and NUL bytes are rejected with `PathTraversal`.
pub fn canonical_path(path: &str) -> Result<String, DavGateError> {
    let mut canonical = String::with_capacity(path.len() + 1);
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(DavGateError::PathTraversal(path.to_string())),
            _ if segment.contains(['\\', '\0']) => {
                return Err(DavGateError::PathTraversal(path.to_string()));
            }
            _ => {
                canonical.push('/');
                canonical.push_str(segment);
            }
        }
    }
    if canonical.is_empty() {
        canonical.push('/');
    } else if path.ends_with('/') || path.ends_with("/.") {
        canonical.push('/');
    }
    Ok(canonical)
}
