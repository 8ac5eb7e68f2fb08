// src/core/state.rs

//! Shared, lockable gateway state for concurrent request handling.

use crate::core::errors::DavGateError;
use crate::core::handler::{DavRequest, DispatchOutcome};
use crate::core::manager::Manager;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Wraps the `Manager` in a read/write lock.
///
/// Each dispatched request holds a read guard until it completes, so a
/// reconfiguration waits for in-flight requests and never observes a user
/// half-way through a scope change.
#[derive(Debug)]
pub struct GateState {
    manager: RwLock<Manager>,
}

impl GateState {
    pub fn new(manager: Manager) -> Arc<Self> {
        Arc::new(Self {
            manager: RwLock::new(manager),
        })
    }

    pub async fn dispatch(&self, request: &DavRequest) -> Result<DispatchOutcome, DavGateError> {
        let manager = self.manager.read().await;
        manager.dispatch(request).await
    }

    /// Applies a configuration change under the write lock.
    pub async fn reconfigure<F, T>(&self, change: F) -> T
    where
        F: FnOnce(&mut Manager) -> T,
    {
        let mut manager = self.manager.write().await;
        change(&mut manager)
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Manager> {
        self.manager.read().await
    }

    pub async fn webdav_url(&self) -> String {
        self.manager.read().await.webdav_url()
    }
}
