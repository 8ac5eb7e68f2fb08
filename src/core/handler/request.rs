// src/core/handler/request.rs

//! The request and outcome types exchanged with the HTTP layer.

use crate::core::errors::DavGateError;
use crate::core::url::canonical_path;
use crate::core::vfs::Entry;
use bytes::Bytes;

/// The file operations the gateway understands, named after their WebDAV methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DavMethod {
    Get,
    Head,
    /// Metadata for a path plus, for a directory, its children.
    Propfind,
    Put,
    Mkcol,
    Delete,
    Move { destination: String },
    Copy { destination: String },
}

impl DavMethod {
    /// Returns true for methods that change the filesystem and therefore run
    /// the save hooks.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, DavMethod::Get | DavMethod::Head | DavMethod::Propfind)
    }

    pub fn destination(&self) -> Option<&str> {
        match self {
            DavMethod::Move { destination } | DavMethod::Copy { destination } => {
                Some(destination)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DavMethod::Get => "GET",
            DavMethod::Head => "HEAD",
            DavMethod::Propfind => "PROPFIND",
            DavMethod::Put => "PUT",
            DavMethod::Mkcol => "MKCOL",
            DavMethod::Delete => "DELETE",
            DavMethod::Move { .. } => "MOVE",
            DavMethod::Copy { .. } => "COPY",
        }
    }
}

/// One request from the HTTP layer. `path` (and any destination) is relative
/// to the WebDAV URL, e.g. `/docs/report.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavRequest {
    /// `None` or an empty string selects the default user.
    pub identity: Option<String>,
    pub path: String,
    pub method: DavMethod,
    pub body: Bytes,
}

impl DavRequest {
    pub fn new(method: DavMethod, path: impl Into<String>) -> Self {
        Self {
            identity: None,
            path: path.into(),
            method,
            body: Bytes::new(),
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns a copy whose path and destination are in canonical form. See
    /// [`canonical_path`].
    pub fn canonicalize(&self) -> Result<DavRequest, DavGateError> {
        let method = match &self.method {
            DavMethod::Move { destination } => DavMethod::Move {
                destination: canonical_path(destination)?,
            },
            DavMethod::Copy { destination } => DavMethod::Copy {
                destination: canonical_path(destination)?,
            },
            other => other.clone(),
        };
        Ok(DavRequest {
            identity: self.identity.clone(),
            path: canonical_path(&self.path)?,
            method,
            body: self.body.clone(),
        })
    }
}

/// What an allowed request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DavReply {
    Content(Bytes),
    Metadata(Entry),
    Listing { entry: Entry, children: Vec<Entry> },
    Created,
    NoContent,
}

/// The result of a dispatched request. Denials are ordinary outcomes, not
/// errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Allowed(DavReply),
    Forbidden,
    NotFound,
}

impl DispatchOutcome {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, DispatchOutcome::Forbidden)
    }
}
