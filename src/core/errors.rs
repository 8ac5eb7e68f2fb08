// src/core/errors.rs

//! Defines the primary error type for the library.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Which save hook produced a `HookFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeSave,
    AfterSave,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::BeforeSave => f.write_str("before-save"),
            HookStage::AfterSave => f.write_str("after-save"),
        }
    }
}

/// The main error enum for configuration and request handling.
///
/// A denied path is not an error: it is reported as
/// [`DispatchOutcome::Forbidden`](crate::core::handler::DispatchOutcome::Forbidden).
#[derive(Error, Debug)]
pub enum DavGateError {
    #[error("user '{0}' already exists")]
    DuplicateIdentity(String),

    #[error("user '{0}' does not exist")]
    UnknownIdentity(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    /// A save hook rejected the operation.
    ///
    /// For `HookStage::AfterSave` the write has already been applied and is
    /// not rolled back; see [`DavGateError::write_committed`].
    #[error("{stage} hook failed: {message}")]
    HookFailure { stage: HookStage, message: String },

    #[error("path escapes the scope root: {0}")]
    PathTraversal(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl DavGateError {
    /// Builds a hook failure from any displayable error.
    pub fn hook(stage: HookStage, message: impl fmt::Display) -> Self {
        DavGateError::HookFailure {
            stage,
            message: message.to_string(),
        }
    }

    /// Returns true when the error was raised after the filesystem write
    /// already went through.
    pub fn write_committed(&self) -> bool {
        matches!(
            self,
            DavGateError::HookFailure {
                stage: HookStage::AfterSave,
                ..
            }
        )
    }
}

// `std::io::Error` is not cloneable, so it is shared through an Arc.
impl Clone for DavGateError {
    fn clone(&self) -> Self {
        match self {
            DavGateError::DuplicateIdentity(s) => DavGateError::DuplicateIdentity(s.clone()),
            DavGateError::UnknownIdentity(s) => DavGateError::UnknownIdentity(s.clone()),
            DavGateError::InvalidIdentity(s) => DavGateError::InvalidIdentity(s.clone()),
            DavGateError::InvalidRule { pattern, reason } => DavGateError::InvalidRule {
                pattern: pattern.clone(),
                reason: reason.clone(),
            },
            DavGateError::HookFailure { stage, message } => DavGateError::HookFailure {
                stage: *stage,
                message: message.clone(),
            },
            DavGateError::PathTraversal(s) => DavGateError::PathTraversal(s.clone()),
            DavGateError::NotFound(s) => DavGateError::NotFound(s.clone()),
            DavGateError::Io(e) => DavGateError::Io(Arc::clone(e)),
            DavGateError::Internal(s) => DavGateError::Internal(s.clone()),
        }
    }
}

impl PartialEq for DavGateError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DavGateError::DuplicateIdentity(a), DavGateError::DuplicateIdentity(b)) => a == b,
            (DavGateError::UnknownIdentity(a), DavGateError::UnknownIdentity(b)) => a == b,
            (DavGateError::InvalidIdentity(a), DavGateError::InvalidIdentity(b)) => a == b,
            (
                DavGateError::InvalidRule {
                    pattern: p1,
                    reason: r1,
                },
                DavGateError::InvalidRule {
                    pattern: p2,
                    reason: r2,
                },
            ) => p1 == p2 && r1 == r2,
            (
                DavGateError::HookFailure {
                    stage: s1,
                    message: m1,
                },
                DavGateError::HookFailure {
                    stage: s2,
                    message: m2,
                },
            ) => s1 == s2 && m1 == m2,
            (DavGateError::PathTraversal(a), DavGateError::PathTraversal(b)) => a == b,
            (DavGateError::NotFound(a), DavGateError::NotFound(b)) => a == b,
            (DavGateError::Io(e1), DavGateError::Io(e2)) => {
                e1.kind() == e2.kind() && e1.to_string() == e2.to_string()
            }
            (DavGateError::Internal(a), DavGateError::Internal(b)) => a == b,
            _ => false,
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for DavGateError {
    fn from(e: std::io::Error) -> Self {
        DavGateError::Io(Arc::new(e))
    }
}
