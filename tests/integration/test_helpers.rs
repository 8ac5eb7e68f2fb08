// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use async_trait::async_trait;
use bytes::Bytes;
use davgate::core::handler::{DavMethod, DavRequest, DispatchOutcome};
use davgate::core::vfs::{DirFs, Entry, FsBuilder, VirtualFs};
use davgate::core::{DavGateError, Manager};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// A `DirFs` that counts every call it receives, and separately every call
/// that would change the disk.
#[derive(Debug)]
pub struct RecordingFs {
    inner: DirFs,
    calls: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl RecordingFs {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn touch_write(&self) {
        self.touch();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl VirtualFs for RecordingFs {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    async fn read(&self, path: &str) -> Result<Bytes, DavGateError> {
        self.touch();
        self.inner.read(path).await
    }

    async fn stat(&self, path: &str) -> Result<Entry, DavGateError> {
        self.touch();
        self.inner.stat(path).await
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<Entry>, DavGateError> {
        self.touch();
        self.inner.read_dir(path).await
    }

    async fn write(&self, path: &str, data: Bytes) -> Result<(), DavGateError> {
        self.touch_write();
        self.inner.write(path, data).await
    }

    async fn create_dir(&self, path: &str) -> Result<(), DavGateError> {
        self.touch_write();
        self.inner.create_dir(path).await
    }

    async fn remove(&self, path: &str) -> Result<(), DavGateError> {
        self.touch_write();
        self.inner.remove(path).await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), DavGateError> {
        self.touch_write();
        self.inner.rename(from, to).await
    }

    async fn copy(&self, from: &str, to: &str) -> Result<(), DavGateError> {
        self.touch_write();
        self.inner.copy(from, to).await
    }
}

/// TestContext provides a manager scoped to a fresh temporary directory
pub struct TestContext {
    pub dir: TempDir,
    pub manager: Manager,
    calls: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl TestContext {
    pub fn new() -> Self {
        // Initialize tracing (ignore error if already initialized)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();

        let dir = TempDir::new().expect("Failed to create temp dir");
        let calls = Arc::new(AtomicUsize::new(0));
        let writes = Arc::new(AtomicUsize::new(0));
        let (call_counter, write_counter) = (Arc::clone(&calls), Arc::clone(&writes));
        let builder: FsBuilder = Arc::new(move |root: &str| {
            Arc::new(RecordingFs {
                inner: DirFs::new(root),
                calls: Arc::clone(&call_counter),
                writes: Arc::clone(&write_counter),
            }) as Arc<dyn VirtualFs>
        });
        let root = dir.path().to_string_lossy().into_owned();
        let manager = Manager::with_fs_builder(&root, builder);
        Self {
            dir,
            manager,
            calls,
            writes,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Number of calls of any kind that reached the filesystem so far.
    pub fn fs_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of mutating calls that reached the filesystem so far.
    pub fn fs_writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Creates a file directly on disk, bypassing the gateway.
    pub fn seed(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative.trim_start_matches('/'));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(path, contents).expect("Failed to seed file");
    }

    pub fn read_disk(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(relative.trim_start_matches('/'))).ok()
    }

    pub async fn dispatch(&self, request: DavRequest) -> Result<DispatchOutcome, DavGateError> {
        self.manager.dispatch(&request).await
    }

    pub async fn get(&self, identity: &str, path: &str) -> Result<DispatchOutcome, DavGateError> {
        self.dispatch(DavRequest::new(DavMethod::Get, path).with_identity(identity))
            .await
    }

    pub async fn put(
        &self,
        identity: &str,
        path: &str,
        body: &'static str,
    ) -> Result<DispatchOutcome, DavGateError> {
        self.dispatch(
            DavRequest::new(DavMethod::Put, path)
                .with_identity(identity)
                .with_body(Bytes::from_static(body.as_bytes())),
        )
        .await
    }
}
