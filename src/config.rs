// src/config.rs

//! Manages gateway configuration: loading, merging the users file, and validation.

use crate::core::acl::enforcer::RuleSet;
use crate::core::acl::rules::RuleConfig;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A named user. Every unset field is inherited from the top-level defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfig {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_edit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_commands: Option<bool>,
    /// Replaces the inherited command list when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
    /// Appended after the inherited rules, so they take precedence.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Represents the data structure of the separate users file (e.g., users.json).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UsersFile {
    pub users: Vec<UserConfig>,
}

/// A raw representation of the config file before validation and merging.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_scope")]
    scope: String,
    #[serde(default)]
    prefix_url: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_true")]
    allow_new: bool,
    #[serde(default = "default_true")]
    allow_edit: bool,
    #[serde(default = "default_true")]
    allow_commands: bool,
    #[serde(default)]
    commands: Vec<String>,
    #[serde(default)]
    rules: Vec<RuleConfig>,
    #[serde(default)]
    users: Vec<UserConfig>,
    #[serde(default)]
    users_file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_scope() -> String {
    ".".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_true() -> bool {
    true
}

/// Represents the final, validated gateway configuration.
///
/// The top-level user fields configure the default user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub scope: String,
    pub prefix_url: String,
    pub base_url: String,
    pub allow_new: bool,
    pub allow_edit: bool,
    pub allow_commands: bool,
    pub commands: Vec<String>,
    pub rules: Vec<RuleConfig>,
    /// Inline users followed by those loaded from `users_file`.
    pub users: Vec<UserConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            scope: default_scope(),
            prefix_url: String::new(),
            base_url: default_base_url(),
            allow_new: true,
            allow_edit: true,
            allow_commands: true,
            commands: Vec::new(),
            rules: Vec::new(),
            users: Vec::new(),
            users_file: None,
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    /// A relative `users_file` is resolved against the config file's directory.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let base_dir = Path::new(path).parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&contents, base_dir).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses TOML text. A relative `users_file` is resolved against the
    /// working directory.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, Path::new("."))
    }

    fn parse(contents: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents).context("Failed to parse TOML")?;

        let mut users = raw.users;
        if let Some(users_file) = &raw.users_file {
            let loaded = load_users_file(&base_dir.join(users_file))?;
            users.extend(loaded.users);
        }

        let config = Config {
            log_level: raw.log_level,
            scope: raw.scope,
            prefix_url: raw.prefix_url,
            base_url: raw.base_url,
            allow_new: raw.allow_new,
            allow_edit: raw.allow_edit,
            allow_commands: raw.allow_commands,
            commands: raw.commands,
            rules: raw.rules,
            users,
            users_file: raw.users_file,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration so that building a `Manager` from it
    /// cannot fail halfway.
    pub fn validate(&self) -> Result<()> {
        if self.scope.trim().is_empty() {
            return Err(anyhow!("scope cannot be empty"));
        }
        RuleSet::from_configs(&self.rules).context("invalid rule for the default user")?;

        let mut seen = HashSet::new();
        for (i, user) in self.users.iter().enumerate() {
            if user.username.trim().is_empty() {
                return Err(anyhow!("user #{} has an empty username", i + 1));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(anyhow!("user '{}' is defined more than once", user.username));
            }
            if let Some(scope) = &user.scope
                && scope.trim().is_empty()
            {
                return Err(anyhow!("user '{}' has an empty scope", user.username));
            }
            RuleSet::from_configs(&user.rules)
                .with_context(|| format!("invalid rule for user '{}'", user.username))?;
        }
        Ok(())
    }

    /// Settings that are valid but almost certainly a mistake. Returned
    /// rather than logged, since configs are usually loaded before the
    /// tracing subscriber is installed.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.allow_commands && !self.commands.is_empty() {
            warnings.push(
                "default user lists commands but allow_commands is false; they will never run"
                    .to_string(),
            );
        }
        for user in &self.users {
            let allow_commands = user.allow_commands.unwrap_or(self.allow_commands);
            let lists_commands = user
                .commands
                .as_ref()
                .is_some_and(|c| !c.is_empty());
            if !allow_commands && lists_commands {
                warnings.push(format!(
                    "user '{}' lists commands but allow_commands is false; they will never run",
                    user.username
                ));
            }
        }
        warnings
    }
}

fn load_users_file(path: &Path) -> Result<UsersFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read users file at '{}'", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from '{}'", path.display()))
}
