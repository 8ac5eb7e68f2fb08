// src/core/manager.rs

//! The `Manager`: every user, the URL layout, and the save hooks.

use crate::config::{Config, UserConfig};
use crate::core::acl::enforcer::RuleSet;
use crate::core::acl::parsed_rules::Rule;
use crate::core::acl::user::{Capabilities, Scope, User};
use crate::core::errors::DavGateError;
use crate::core::handler::{DavRequest, DispatchOutcome, router};
use crate::core::hooks::{NoopHook, SaveHook};
use crate::core::url::{WEBDAV_SUFFIX, mount_fragment};
use crate::core::vfs::{FsBuilder, dir_fs_builder};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Owns the default user, the named users, and the URL layout.
///
/// Configuration methods take `&mut self`; request handling only needs
/// `&self`. To reconfigure while serving, share the manager through
/// [`GateState`](crate::core::state::GateState).
pub struct Manager {
    default_user: User,
    users: HashMap<String, User>,
    /// Already stripped from request URLs before they reach us, e.g. when
    /// mounted behind another router.
    prefix_url: String,
    /// Where the gateway itself is mounted, below `prefix_url`.
    base_url: String,
    before_save: Arc<dyn SaveHook>,
    after_save: Arc<dyn SaveHook>,
    fs_builder: FsBuilder,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("default_user", &self.default_user)
            .field("users", &self.users)
            .field("prefix_url", &self.prefix_url)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Creates a manager whose default user is confined to `scope` on the
    /// local disk, with every capability and no rules.
    pub fn new(scope: &str) -> Self {
        Self::with_fs_builder(scope, dir_fs_builder())
    }

    /// Like [`Manager::new`], with a custom filesystem backend. The builder
    /// is called again whenever any user's scope changes.
    pub fn with_fs_builder(scope: &str, fs_builder: FsBuilder) -> Self {
        let default_user = User::new(Scope::new(scope, &fs_builder));
        let mut manager = Self {
            default_user,
            users: HashMap::new(),
            prefix_url: String::new(),
            base_url: String::new(),
            before_save: Arc::new(NoopHook),
            after_save: Arc::new(NoopHook),
            fs_builder,
        };
        manager.set_base_url("/");
        manager
    }

    /// Builds a manager from a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self, DavGateError> {
        Self::from_config_with_fs_builder(config, dir_fs_builder())
    }

    pub fn from_config_with_fs_builder(
        config: &Config,
        fs_builder: FsBuilder,
    ) -> Result<Self, DavGateError> {
        let mut manager = Self::with_fs_builder(&config.scope, fs_builder);
        manager.set_prefix_url(&config.prefix_url);
        manager.set_base_url(&config.base_url);

        let default_user = &mut manager.default_user;
        default_user.rules = RuleSet::from_configs(&config.rules)?;
        default_user.set_capability(Capabilities::NEW, config.allow_new);
        default_user.set_capability(Capabilities::EDIT, config.allow_edit);
        default_user.set_capability(Capabilities::COMMANDS, config.allow_commands);
        default_user.commands = config.commands.iter().cloned().collect();

        for user_config in &config.users {
            manager.apply_user_config(user_config)?;
        }

        info!(
            "Gateway configured: root URL '{}', {} named user(s).",
            manager.root_url(),
            manager.users.len()
        );
        Ok(manager)
    }

    fn apply_user_config(&mut self, config: &UserConfig) -> Result<(), DavGateError> {
        // Compile first so a bad rule leaves no half-registered user behind.
        let extra_rules = RuleSet::from_configs(&config.rules)?;
        self.new_user(&config.username)?;
        if let Some(scope) = &config.scope {
            self.set_scope(scope, &config.username)?;
        }

        let user = self.user_mut(&config.username)?;
        user.rules.extend(extra_rules);
        if let Some(allow) = config.allow_new {
            user.set_capability(Capabilities::NEW, allow);
        }
        if let Some(allow) = config.allow_edit {
            user.set_capability(Capabilities::EDIT, allow);
        }
        if let Some(allow) = config.allow_commands {
            user.set_capability(Capabilities::COMMANDS, allow);
        }
        if let Some(commands) = &config.commands {
            user.commands = commands.iter().cloned().collect();
        }
        Ok(())
    }

    /// The URL where the gateway is reachable from outside.
    pub fn root_url(&self) -> String {
        format!("{}{}", self.prefix_url, self.base_url)
    }

    /// The URL where WebDAV is served: the root URL plus `/api/webdav`.
    pub fn webdav_url(&self) -> String {
        format!("{}{}", self.root_url(), WEBDAV_SUFFIX)
    }

    pub fn prefix_url(&self) -> &str {
        &self.prefix_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_prefix_url(&mut self, url: &str) {
        self.prefix_url = mount_fragment(url);
        debug!(prefix_url = %self.prefix_url, "Prefix URL updated");
    }

    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = mount_fragment(url);
        debug!(base_url = %self.base_url, "Base URL updated");
    }

    /// Maps a URL path, as seen after `prefix_url` was stripped, to the path
    /// inside the WebDAV tree. Returns `None` for paths outside it.
    pub fn webdav_path<'a>(&self, url_path: &'a str) -> Option<&'a str> {
        let mount = format!("{}{}", self.base_url, WEBDAV_SUFFIX);
        let rest = url_path.strip_prefix(mount.as_str())?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Rebinds a user's scope and rebuilds its filesystem in the same step.
    /// An empty `identity` selects the default user. One trailing slash is
    /// trimmed from `root`, except that `/` itself stays `/` rather than
    /// becoming the current directory.
    pub fn set_scope(&mut self, root: &str, identity: &str) -> Result<(), DavGateError> {
        let builder = Arc::clone(&self.fs_builder);
        let user = self.user_mut(identity)?;
        user.scope.rebind(root, &builder);
        info!(
            identity = identity,
            scope = user.scope.root(),
            "Scope updated"
        );
        Ok(())
    }

    /// Registers a named user as a copy of the default user's current scope,
    /// rules, capabilities and commands. The copy is independent: later
    /// changes to the default user do not reach it.
    pub fn new_user(&mut self, username: &str) -> Result<&mut User, DavGateError> {
        if username.is_empty() {
            return Err(DavGateError::InvalidIdentity(
                "username cannot be empty".to_string(),
            ));
        }
        if self.users.contains_key(username) {
            return Err(DavGateError::DuplicateIdentity(username.to_string()));
        }
        let snapshot = self.default_user.clone();
        info!(identity = username, "User registered");
        Ok(self.users.entry(username.to_string()).or_insert(snapshot))
    }

    pub fn default_user(&self) -> &User {
        &self.default_user
    }

    pub fn default_user_mut(&mut self) -> &mut User {
        &mut self.default_user
    }

    /// Looks up a user. An empty `identity` selects the default user.
    pub fn user(&self, identity: &str) -> Result<&User, DavGateError> {
        if identity.is_empty() {
            return Ok(&self.default_user);
        }
        self.users
            .get(identity)
            .ok_or_else(|| DavGateError::UnknownIdentity(identity.to_string()))
    }

    pub fn user_mut(&mut self, identity: &str) -> Result<&mut User, DavGateError> {
        if identity.is_empty() {
            return Ok(&mut self.default_user);
        }
        self.users
            .get_mut(identity)
            .ok_or_else(|| DavGateError::UnknownIdentity(identity.to_string()))
    }

    /// Resolves the identity carried by a request; none means the default user.
    pub fn resolve_user(&self, identity: Option<&str>) -> Result<&User, DavGateError> {
        self.user(identity.unwrap_or(""))
    }

    /// Registered usernames, sorted.
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn add_rule(&mut self, identity: &str, rule: Rule) -> Result<(), DavGateError> {
        self.user_mut(identity)?.add_rule(rule);
        Ok(())
    }

    /// Evaluates `path` against a user's rules.
    pub fn allowed(&self, identity: &str, path: &str) -> Result<bool, DavGateError> {
        Ok(self.user(identity)?.allowed(path))
    }

    pub fn set_before_save(&mut self, hook: impl SaveHook + 'static) {
        self.before_save = Arc::new(hook);
    }

    pub fn set_after_save(&mut self, hook: impl SaveHook + 'static) {
        self.after_save = Arc::new(hook);
    }

    pub fn before_save(&self) -> &dyn SaveHook {
        self.before_save.as_ref()
    }

    pub fn after_save(&self) -> &dyn SaveHook {
        self.after_save.as_ref()
    }

    /// The single entry point for the HTTP layer. See
    /// [`router::route`] for the order of checks.
    pub async fn dispatch(&self, request: &DavRequest) -> Result<DispatchOutcome, DavGateError> {
        router::route(self, request).await
    }
}
