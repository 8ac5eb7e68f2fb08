// src/core/handler/router.rs

//! Routes an authorized request to the user's virtual filesystem, running the
//! save hooks around writes.

use super::pipeline::acl_check;
use super::{DavMethod, DavReply, DavRequest, DispatchOutcome};
use crate::core::acl::user::User;
use crate::core::errors::{DavGateError, HookStage};
use crate::core::manager::Manager;
use crate::core::vfs::VirtualFs;
use tracing::{debug, warn};

/// Processes one request end to end.
///
/// Order of checks: path canonicalization, identity, path rules, the
/// capabilities that need no filesystem lookup, `before_save`, the remaining
/// capability check, the write itself, `after_save`. A failing `before_save`
/// means the filesystem is never touched, not even for a lookup. A failing
/// `after_save` is returned as an error even though the write has already
/// been applied.
pub async fn route(
    manager: &Manager,
    request: &DavRequest,
) -> Result<DispatchOutcome, DavGateError> {
    let request = &request.canonicalize().inspect_err(|e| {
        warn!(
            path = %request.path,
            method = request.method.name(),
            "Rejected request path: {e}"
        );
    })?;
    let user = manager.resolve_user(request.identity.as_deref())?;

    if !acl_check::paths_allowed(user, request) {
        return Ok(DispatchOutcome::Forbidden);
    }

    let fs = user.scope.fs().as_ref();
    if !request.method.is_mutating() {
        return not_found_as_outcome(read(fs, request).await);
    }

    if !acl_check::capabilities_may_allow(user, &request.method) {
        return Ok(DispatchOutcome::Forbidden);
    }

    run_hook(HookStage::BeforeSave, manager, user, request)?;

    // PUT needs NEW or EDIT depending on whether the target exists.
    let target_exists = match request.method {
        DavMethod::Put => fs.exists(&request.path).await?,
        _ => false,
    };
    if !acl_check::capabilities_allow(user, &request.method, target_exists) {
        return Ok(DispatchOutcome::Forbidden);
    }

    let outcome = not_found_as_outcome(write(fs, request, target_exists).await)?;
    if matches!(outcome, DispatchOutcome::NotFound) {
        return Ok(outcome);
    }

    run_hook(HookStage::AfterSave, manager, user, request)?;
    Ok(outcome)
}

fn run_hook(
    stage: HookStage,
    manager: &Manager,
    user: &User,
    request: &DavRequest,
) -> Result<(), DavGateError> {
    let hook = match stage {
        HookStage::BeforeSave => manager.before_save(),
        HookStage::AfterSave => manager.after_save(),
    };
    hook.call(request, manager, user).map_err(|e| {
        warn!(
            stage = %stage,
            path = %request.path,
            method = request.method.name(),
            "Save hook failed: {e:#}"
        );
        DavGateError::hook(stage, format!("{e:#}"))
    })
}

fn not_found_as_outcome(
    result: Result<DavReply, DavGateError>,
) -> Result<DispatchOutcome, DavGateError> {
    match result {
        Ok(reply) => Ok(DispatchOutcome::Allowed(reply)),
        Err(DavGateError::NotFound(path)) => {
            debug!(path = %path, "Not found");
            Ok(DispatchOutcome::NotFound)
        }
        Err(e) => Err(e),
    }
}

async fn read(fs: &dyn VirtualFs, request: &DavRequest) -> Result<DavReply, DavGateError> {
    let path = request.path.as_str();
    match &request.method {
        DavMethod::Get => Ok(DavReply::Content(fs.read(path).await?)),
        DavMethod::Head => Ok(DavReply::Metadata(fs.stat(path).await?)),
        DavMethod::Propfind => {
            let entry = fs.stat(path).await?;
            let children = if entry.is_dir {
                fs.read_dir(path).await?
            } else {
                Vec::new()
            };
            Ok(DavReply::Listing { entry, children })
        }
        other => Err(DavGateError::Internal(format!(
            "{} is not a read operation",
            other.name()
        ))),
    }
}

async fn write(
    fs: &dyn VirtualFs,
    request: &DavRequest,
    target_exists: bool,
) -> Result<DavReply, DavGateError> {
    let path = request.path.as_str();
    match &request.method {
        DavMethod::Put => {
            fs.write(path, request.body.clone()).await?;
            Ok(if target_exists {
                DavReply::NoContent
            } else {
                DavReply::Created
            })
        }
        DavMethod::Mkcol => {
            fs.create_dir(path).await?;
            Ok(DavReply::Created)
        }
        DavMethod::Delete => {
            fs.remove(path).await?;
            Ok(DavReply::NoContent)
        }
        DavMethod::Move { destination } => {
            fs.rename(path, destination).await?;
            Ok(DavReply::Created)
        }
        DavMethod::Copy { destination } => {
            fs.copy(path, destination).await?;
            Ok(DavReply::Created)
        }
        other => Err(DavGateError::Internal(format!(
            "{} is not a write operation",
            other.name()
        ))),
    }
}
