// src/core/vfs/dir.rs

//! A `VirtualFs` backed by a directory on the local disk.

use super::{Entry, VirtualFs};
use crate::core::errors::DavGateError;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// An empty root means the current working directory.
    pub fn new(root: &str) -> Self {
        let root = if root.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(root)
        };
        Self { root }
    }

    /// Joins a request path onto the root, component by component.
    /// `..` is rejected outright rather than resolved, so the result can
    /// never leave the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, DavGateError> {
        let mut resolved = self.root.clone();
        for part in path.split('/') {
            match part {
                "" | "." => continue,
                ".." => {
                    warn!(path = %path, "Rejected path traversal attempt");
                    return Err(DavGateError::PathTraversal(path.to_string()));
                }
                _ if part.contains(['\0', '\\']) || (cfg!(windows) && part.contains(':')) => {
                    return Err(DavGateError::PathTraversal(path.to_string()));
                }
                _ => resolved.push(part),
            }
        }
        Ok(resolved)
    }

    fn map_io(path: &str, e: std::io::Error) -> DavGateError {
        if e.kind() == ErrorKind::NotFound {
            DavGateError::NotFound(path.to_string())
        } else {
            DavGateError::from(e)
        }
    }

    fn entry_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    async fn entry_for(path: &Path) -> std::io::Result<Entry> {
        let meta = fs::metadata(path).await?;
        Ok(Entry {
            name: Self::entry_name(path),
            is_dir: meta.is_dir(),
            size: if meta.is_dir() { 0 } else { meta.len() },
            modified: meta.modified().ok(),
        })
    }

    async fn copy_tree(from: PathBuf, to: PathBuf) -> std::io::Result<()> {
        let mut pending = vec![(from, to)];
        while let Some((src, dst)) = pending.pop() {
            if fs::metadata(&src).await?.is_dir() {
                fs::create_dir_all(&dst).await?;
                let mut entries = fs::read_dir(&src).await?;
                while let Some(entry) = entries.next_entry().await? {
                    pending.push((entry.path(), dst.join(entry.file_name())));
                }
            } else {
                fs::copy(&src, &dst).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl VirtualFs for DirFs {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn read(&self, path: &str) -> Result<Bytes, DavGateError> {
        let full = self.resolve(path)?;
        let data = fs::read(&full).await.map_err(|e| Self::map_io(path, e))?;
        Ok(Bytes::from(data))
    }

    async fn stat(&self, path: &str) -> Result<Entry, DavGateError> {
        let full = self.resolve(path)?;
        Self::entry_for(&full)
            .await
            .map_err(|e| Self::map_io(path, e))
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<Entry>, DavGateError> {
        let full = self.resolve(path)?;
        let mut reader = fs::read_dir(&full)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        let mut entries = Vec::new();
        while let Some(item) = reader.next_entry().await? {
            match Self::entry_for(&item.path()).await {
                Ok(entry) => entries.push(entry),
                // Raced with a concurrent delete.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn write(&self, path: &str, data: Bytes) -> Result<(), DavGateError> {
        let full = self.resolve(path)?;
        debug!(path = %full.display(), bytes = data.len(), "Writing file");
        fs::write(&full, &data)
            .await
            .map_err(|e| Self::map_io(path, e))
    }

    async fn create_dir(&self, path: &str) -> Result<(), DavGateError> {
        let full = self.resolve(path)?;
        fs::create_dir(&full)
            .await
            .map_err(|e| Self::map_io(path, e))
    }

    async fn remove(&self, path: &str) -> Result<(), DavGateError> {
        let full = self.resolve(path)?;
        if full == self.root {
            return Err(DavGateError::PathTraversal(path.to_string()));
        }
        let meta = fs::metadata(&full)
            .await
            .map_err(|e| Self::map_io(path, e))?;
        let result = if meta.is_dir() {
            fs::remove_dir_all(&full).await
        } else {
            fs::remove_file(&full).await
        };
        result.map_err(|e| Self::map_io(path, e))
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), DavGateError> {
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        fs::rename(&src, &dst)
            .await
            .map_err(|e| Self::map_io(from, e))
    }

    async fn copy(&self, from: &str, to: &str) -> Result<(), DavGateError> {
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        if dst.starts_with(&src) {
            return Err(DavGateError::Internal(format!(
                "cannot copy '{from}' into itself"
            )));
        }
        Self::copy_tree(src, dst)
            .await
            .map_err(|e| Self::map_io(from, e))
    }
}
