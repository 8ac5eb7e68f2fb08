// src/core/hooks.rs

//! Callbacks run around every state-mutating request.

use crate::core::acl::user::User;
use crate::core::handler::DavRequest;
use crate::core::manager::Manager;

/// A hook invoked synchronously on the request's own task, once before and
/// once after a write. There is no timeout: a hook that blocks, blocks the
/// request.
///
/// Any closure with the matching signature is a `SaveHook`:
///
/// ```
/// use davgate::core::acl::user::User;
/// use davgate::core::handler::DavRequest;
/// use davgate::core::manager::Manager;
///
/// let mut manager = Manager::new("/srv/files");
/// manager.set_before_save(|req: &DavRequest, _: &Manager, _: &User| -> anyhow::Result<()> {
///     if req.path.ends_with(".lock") {
///         anyhow::bail!("lock files are read-only");
///     }
///     Ok(())
/// });
/// ```
pub trait SaveHook: Send + Sync {
    fn call(&self, request: &DavRequest, manager: &Manager, user: &User) -> anyhow::Result<()>;
}

impl<F> SaveHook for F
where
    F: Fn(&DavRequest, &Manager, &User) -> anyhow::Result<()> + Send + Sync,
{
    fn call(&self, request: &DavRequest, manager: &Manager, user: &User) -> anyhow::Result<()> {
        self(request, manager, user)
    }
}

/// The default hook. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl SaveHook for NoopHook {
    fn call(&self, _: &DavRequest, _: &Manager, _: &User) -> anyhow::Result<()> {
        Ok(())
    }
}
