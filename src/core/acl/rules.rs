// src/core/acl/rules.rs

use serde::{Deserialize, Serialize};

/// Represents a single access rule as written in the configuration file.
///
/// ```toml
/// rules = [
///     { path = "/private", allow = false },
///     { path = "\\.secret$", regex = true, allow = false },
/// ]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    /// A literal path prefix, or a regular expression when `regex` is set.
    pub path: String,
    /// Interpret `path` as a regular expression instead of a literal prefix.
    #[serde(default)]
    pub regex: bool,
    /// The verdict this rule yields when it matches. `false` makes it a deny rule.
    pub allow: bool,
}

impl RuleConfig {
    pub fn prefix(path: impl Into<String>, allow: bool) -> Self {
        Self {
            path: path.into(),
            regex: false,
            allow,
        }
    }

    pub fn regex(pattern: impl Into<String>, allow: bool) -> Self {
        Self {
            path: pattern.into(),
            regex: true,
            allow,
        }
    }
}
