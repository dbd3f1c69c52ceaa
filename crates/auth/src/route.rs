//! Route classification (protected vs. public).

use serde::Serialize;
use thiserror::Error;

/// Classification of a request path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    Protected,
    Public,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteConfigError {
    #[error("protected path pattern is empty")]
    Empty,

    #[error("protected path pattern '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("protected path pattern '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("protected path pattern '{pattern}' contains unsupported character {found:?}")]
    UnsupportedCharacter { pattern: String, found: char },

    #[error("no protected path prefixes configured")]
    NoPrefixes,

    #[error("login path '{0}' is itself protected")]
    LoginPathProtected(String),
}

/// A validated protected path prefix (literal segments only).
///
/// Stored without a trailing slash; the root prefix `/` is stored as `""`
/// and matches every path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtectedPrefix(String);

impl ProtectedPrefix {
    pub fn parse(pattern: &str) -> Result<Self, RouteConfigError> {
        if pattern.is_empty() {
            return Err(RouteConfigError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(RouteConfigError::NotAbsolute(pattern.to_string()));
        }
        if let Some(found) = pattern
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '*' | '?' | '#' | '[' | ']'))
        {
            return Err(RouteConfigError::UnsupportedCharacter {
                pattern: pattern.to_string(),
                found,
            });
        }

        // Checked before normalizing, so `///` cannot collapse into the root.
        if pattern.contains("//") {
            return Err(RouteConfigError::EmptySegment(pattern.to_string()));
        }
        let normalized = pattern.strip_suffix('/').unwrap_or(pattern);

        Ok(Self(normalized.to_string()))
    }

    /// Segment-aware prefix match: `/dashboard` matches `/dashboard` and
    /// `/dashboard/...` but not `/dashboardx`.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        if self.0.is_empty() { "/" } else { &self.0 }
    }
}

impl core::fmt::Display for ProtectedPrefix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps request paths to [`RouteClass`] against an ordered set of prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteClassifier {
    prefixes: Vec<ProtectedPrefix>,
}

impl RouteClassifier {
    /// Build a classifier from protected path patterns.
    ///
    /// Fails on the first invalid pattern, or when there are no patterns at
    /// all. Duplicates are dropped, first occurrence keeps its position.
    pub fn new<I, S>(patterns: I) -> Result<Self, RouteConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes: Vec<ProtectedPrefix> = Vec::new();
        for pattern in patterns {
            let prefix = ProtectedPrefix::parse(pattern.as_ref())?;
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        if prefixes.is_empty() {
            return Err(RouteConfigError::NoPrefixes);
        }
        Ok(Self { prefixes })
    }

    pub fn prefixes(&self) -> &[ProtectedPrefix] {
        &self.prefixes
    }

    /// The first configured prefix matching `path`, if any.
    pub fn matching_prefix(&self, path: &str) -> Option<&ProtectedPrefix> {
        let path = strip_query_and_fragment(path);
        self.prefixes.iter().find(|p| p.matches(path))
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self.matching_prefix(path).is_some() {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }
}

pub(crate) fn strip_query_and_fragment(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}
