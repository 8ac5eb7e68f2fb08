// src/core/handler/mod.rs

//! Request handling: the types the HTTP layer exchanges with the gateway and
//! the pipeline that authorizes and routes them.

pub mod pipeline;
pub mod request;
pub mod router;

pub use request::{DavMethod, DavReply, DavRequest, DispatchOutcome};
