// src/core/mod.rs

//! The central module containing the core logic and data structures of davgate.

pub mod acl;
pub mod errors;
pub mod handler;
pub mod hooks;
pub mod manager;
pub mod state;
pub mod url;
pub mod vfs;

pub use errors::DavGateError;
pub use manager::Manager;
