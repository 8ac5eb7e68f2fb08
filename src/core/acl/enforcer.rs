// src/core/acl/enforcer.rs

use crate::core::acl::parsed_rules::Rule;
use crate::core::acl::rules::RuleConfig;
use crate::core::errors::DavGateError;

/// An ordered list of allow/deny rules.
///
/// Later rules take precedence over earlier ones: evaluation walks the list
/// from the most recently added rule backwards and stops at the first match.
/// A path no rule matches is allowed.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a list of rule definitions, failing on the first invalid
    /// regular expression. Nothing is returned on failure.
    pub fn from_configs(configs: &[RuleConfig]) -> Result<Self, DavGateError> {
        let rules = configs
            .iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn extend(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Decides whether `path` is permitted.
    ///
    /// Regex and prefix rules are not ranked by kind or specificity; only
    /// their position in the list matters.
    pub fn allowed(&self, path: &str) -> bool {
        for rule in self.rules.iter().rev() {
            if rule.matches(path) {
                return rule.allow;
            }
        }
        true
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}
