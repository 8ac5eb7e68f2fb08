// src/core/handler/pipeline/acl_check.rs

//! Pipeline step for enforcing path rules and user capabilities.

use crate::core::acl::user::{Capabilities, User};
use crate::core::handler::{DavMethod, DavRequest};
use tracing::debug;

/// Checks the request path, and the destination of a MOVE or COPY, against
/// the user's rules.
pub fn paths_allowed(user: &User, request: &DavRequest) -> bool {
    if !user.allowed(&request.path) {
        debug!(
            identity = request.identity.as_deref().unwrap_or(""),
            path = %request.path,
            method = request.method.name(),
            "Path denied by rule"
        );
        return false;
    }
    if let Some(destination) = request.method.destination()
        && !user.allowed(destination)
    {
        debug!(
            identity = request.identity.as_deref().unwrap_or(""),
            destination = %destination,
            method = request.method.name(),
            "Destination denied by rule"
        );
        return false;
    }
    true
}

/// The capability a mutating method needs. `target_exists` only matters for
/// PUT, which edits an existing file but creates a missing one.
pub fn required_capability(method: &DavMethod, target_exists: bool) -> Option<Capabilities> {
    match method {
        DavMethod::Get | DavMethod::Head | DavMethod::Propfind => None,
        DavMethod::Put if target_exists => Some(Capabilities::EDIT),
        DavMethod::Put | DavMethod::Mkcol | DavMethod::Copy { .. } => Some(Capabilities::NEW),
        DavMethod::Delete | DavMethod::Move { .. } => Some(Capabilities::EDIT),
    }
}

/// The capability check that can be made before looking at the filesystem.
/// A PUT passes if the user may either create or edit; the exact
/// requirement is settled by [`capabilities_allow`] once the target's
/// existence is known.
pub fn capabilities_may_allow(user: &User, method: &DavMethod) -> bool {
    let allowed = match method {
        DavMethod::Put => user
            .capabilities
            .intersects(Capabilities::NEW | Capabilities::EDIT),
        other => required_capability(other, false)
            .is_none_or(|needed| user.capabilities.contains(needed)),
    };
    if !allowed {
        debug!(method = method.name(), "Missing capability");
    }
    allowed
}

/// Checks the user's capabilities for a request.
pub fn capabilities_allow(user: &User, method: &DavMethod, target_exists: bool) -> bool {
    match required_capability(method, target_exists) {
        Some(needed) if !user.capabilities.contains(needed) => {
            debug!(
                method = method.name(),
                needed = ?needed,
                "Missing capability"
            );
            false
        }
        _ => true,
    }
}
