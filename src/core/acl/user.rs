// src/core/acl/user.rs

use crate::core::acl::enforcer::RuleSet;
use crate::core::acl::parsed_rules::Rule;
use crate::core::vfs::{FsBuilder, VirtualFs};
use bitflags::bitflags;
use std::collections::BTreeSet;
use std::sync::Arc;

bitflags! {
    /// The actions a user may perform beyond reading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Create files and folders.
        const NEW      = 1 << 0;
        /// Edit, rename and delete files.
        const EDIT     = 1 << 1;
        /// Execute commands from the user's allow-list.
        const COMMANDS = 1 << 2;
    }
}

/// A root directory and the filesystem rooted there.
///
/// The two fields can only change together through [`Scope::rebind`].
#[derive(Debug, Clone)]
pub struct Scope {
    root: String,
    fs: Arc<dyn VirtualFs>,
}

impl Scope {
    pub fn new(root: &str, builder: &FsBuilder) -> Self {
        let root = trim_scope(root);
        let fs = builder(&root);
        Self { root, fs }
    }

    pub fn rebind(&mut self, root: &str, builder: &FsBuilder) {
        *self = Scope::new(root, builder);
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn fs(&self) -> &Arc<dyn VirtualFs> {
        &self.fs
    }
}

fn trim_scope(root: &str) -> String {
    match root.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => root.to_string(),
    }
}

/// Represents a single user: where they are confined, which paths they may
/// touch, and what they may do there.
///
/// Cloning a user produces an independent copy. Rules are values, so editing
/// the clone's rules never affects the original.
#[derive(Debug, Clone)]
pub struct User {
    pub scope: Scope,
    pub rules: RuleSet,
    pub capabilities: Capabilities,
    /// Command names runnable when `Capabilities::COMMANDS` is set.
    pub commands: BTreeSet<String>,
}

impl User {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            rules: RuleSet::new(),
            capabilities: Capabilities::all(),
            commands: BTreeSet::new(),
        }
    }

    pub fn allowed(&self, path: &str) -> bool {
        self.rules.allowed(path)
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn can_create(&self) -> bool {
        self.capabilities.contains(Capabilities::NEW)
    }

    pub fn can_edit(&self) -> bool {
        self.capabilities.contains(Capabilities::EDIT)
    }

    /// Checks a command line against the allow-list. Only the first word
    /// (the program name) is compared.
    pub fn can_execute(&self, command_line: &str) -> bool {
        if !self.capabilities.contains(Capabilities::COMMANDS) {
            return false;
        }
        command_line
            .split_whitespace()
            .next()
            .is_some_and(|name| self.commands.contains(name))
    }

    pub fn set_capability(&mut self, capability: Capabilities, enabled: bool) {
        self.capabilities.set(capability, enabled);
    }
}
