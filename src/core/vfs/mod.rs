// src/core/vfs/mod.rs

//! The virtual filesystem a user's scope is bound to.
//!
//! Every path handed to a [`VirtualFs`] is a request path (`/docs/a.txt`)
//! interpreted relative to the filesystem's root. Implementations must refuse
//! to resolve anything outside that root.

pub mod dir;

use crate::core::errors::DavGateError;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

pub use dir::DirFs;

/// Metadata for a single file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The final path component, or an empty string for the root.
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

#[async_trait]
pub trait VirtualFs: Send + Sync + fmt::Debug {
    /// The directory this filesystem is rooted at.
    fn root(&self) -> &Path;

    async fn read(&self, path: &str) -> Result<Bytes, DavGateError>;

    async fn stat(&self, path: &str) -> Result<Entry, DavGateError>;

    /// Lists a directory, sorted by name.
    async fn read_dir(&self, path: &str) -> Result<Vec<Entry>, DavGateError>;

    /// Creates or truncates the file at `path`.
    async fn write(&self, path: &str, data: Bytes) -> Result<(), DavGateError>;

    async fn create_dir(&self, path: &str) -> Result<(), DavGateError>;

    /// Removes a file, or a directory with everything below it.
    async fn remove(&self, path: &str) -> Result<(), DavGateError>;

    async fn rename(&self, from: &str, to: &str) -> Result<(), DavGateError>;

    async fn copy(&self, from: &str, to: &str) -> Result<(), DavGateError>;

    /// Convenience wrapper over `stat` that treats `NotFound` as `false`.
    async fn exists(&self, path: &str) -> Result<bool, DavGateError> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(DavGateError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Builds the filesystem for a scope root. Called every time a scope changes.
pub type FsBuilder = Arc<dyn Fn(&str) -> Arc<dyn VirtualFs> + Send + Sync>;

/// The default builder, producing a [`DirFs`] on the local disk.
pub fn dir_fs_builder() -> FsBuilder {
    Arc::new(|root: &str| Arc::new(DirFs::new(root)) as Arc<dyn VirtualFs>)
}
