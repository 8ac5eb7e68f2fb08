// src/core/acl/parsed_rules.rs

use crate::core::acl::rules::RuleConfig;
use crate::core::errors::DavGateError;
use regex::Regex;

/// How a rule decides whether it applies to a path.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Matches any path that starts with this literal string.
    Prefix(String),
    /// Matches any path the expression finds a match in (unanchored).
    Regex(Regex),
}

/// An internal, compiled representation of a `RuleConfig`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub matcher: RuleMatcher,
    pub allow: bool,
}

impl Rule {
    pub fn prefix(path: impl Into<String>, allow: bool) -> Self {
        Rule {
            matcher: RuleMatcher::Prefix(path.into()),
            allow,
        }
    }

    /// Compiles a regular-expression rule. An invalid pattern is rejected
    /// here so evaluation can never fail.
    pub fn regex(pattern: &str, allow: bool) -> Result<Self, DavGateError> {
        let regex = Regex::new(pattern).map_err(|e| DavGateError::InvalidRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Rule {
            matcher: RuleMatcher::Regex(regex),
            allow,
        })
    }

    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, RuleMatcher::Regex(_))
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.matcher {
            RuleMatcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
            RuleMatcher::Regex(regex) => regex.is_match(path),
        }
    }
}

impl TryFrom<&RuleConfig> for Rule {
    type Error = DavGateError;

    fn try_from(config: &RuleConfig) -> Result<Self, Self::Error> {
        if config.regex {
            Rule::regex(&config.path, config.allow)
        } else {
            Ok(Rule::prefix(config.path.clone(), config.allow))
        }
    }
}
