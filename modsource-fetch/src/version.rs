//! Release tag normalization and ignore-version rules.

use semver::Version;

use crate::error::SyncError;

/// Strip one leading literal `v` from a release tag, if present.
pub fn normalize_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// A configured version exclusion.
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreRule {
    /// Skip the exactly matching version (semantic equality).
    Exact(Version),
    /// `<bound`: skip versions strictly less than the bound.
    Below(Version),
}

impl IgnoreRule {
    pub fn parse(rule: &str) -> Result<Self, semver::Error> {
        match rule.strip_prefix('<') {
            Some(bound) => Ok(Self::Below(Version::parse(bound.trim())?)),
            None => Ok(Self::Exact(Version::parse(rule.trim())?)),
        }
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(exact) => version == exact,
            Self::Below(bound) => version < bound,
        }
    }
}

/// Parse an entry's configured ignore rules. An unparseable rule is a
/// configuration error and fails the run.
pub fn parse_rules(entry: &str, rules: &[String]) -> Result<Vec<IgnoreRule>, SyncError> {
    rules
        .iter()
        .map(|rule| {
            IgnoreRule::parse(rule).map_err(|e| SyncError::BadIgnoreRule {
                entry: entry.to_string(),
                rule: rule.clone(),
                source: e,
            })
        })
        .collect()
}

/// Evaluate rules in configured order; the first match wins.
pub fn is_ignored(rules: &[IgnoreRule], version: &Version) -> bool {
    rules.iter().any(|rule| rule.matches(version))
}
