//! Route pattern matching.
//!
//! # Responsibilities
//! - Parse category patterns from configuration
//! - Match normalized paths segment by segment (case-sensitive)
//! - Combine patterns of one category with OR semantics
//!
//! # Pattern Grammar
//! - `*` alone matches every path
//! - literal segments match exactly: `/select-org`
//! - `*` in the middle matches exactly one segment: `/t/*/settings`
//! - a trailing `*` matches zero or more segments: `/dashboard/*`
//!   matches `/dashboard` and `/dashboard/a/b` but not `/dashboardx`
//!
//! # Design Decisions
//! - No regex to guarantee O(n) matching
//! - Patterns are validated once at construction; matching cannot fail

use std::str::FromStr;
use thiserror::Error;

use crate::routing::normalize::NormalizedPath;

/// Trait for matching normalized paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &NormalizedPath) -> bool;
}

/// Errors raised while parsing a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern {0:?} must start with '/' or be exactly '*'")]
    NotAbsolute(String),

    #[error("pattern {0:?} contains an empty segment")]
    EmptySegment(String),

    #[error("pattern {0:?} uses '*' inside a segment; wildcards must be a whole segment")]
    PartialWildcard(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Single,
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    open_tail: bool,
    match_all: bool,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        if raw.is_empty() {
            return Err(PatternError::Empty);
        }
        if raw == "*" {
            return Ok(Self {
                raw: raw.to_string(),
                segments: Vec::new(),
                open_tail: true,
                match_all: true,
            });
        }
        let Some(body) = raw.strip_prefix('/') else {
            return Err(PatternError::NotAbsolute(raw.to_string()));
        };

        // "/" is the exact root.
        if body.is_empty() {
            return Ok(Self {
                raw: raw.to_string(),
                segments: Vec::new(),
                open_tail: false,
                match_all: false,
            });
        }

        let parts: Vec<&str> = body.split('/').collect();
        let last = parts.len() - 1;
        let mut segments = Vec::with_capacity(parts.len());
        let mut open_tail = false;

        for (i, part) in parts.iter().enumerate() {
            match *part {
                "" => return Err(PatternError::EmptySegment(raw.to_string())),
                "*" if i == last => open_tail = true,
                "*" => segments.push(Segment::Single),
                p if p.contains('*') => {
                    return Err(PatternError::PartialWildcard(raw.to_string()))
                }
                p => segments.push(Segment::Literal(p.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            open_tail,
            match_all: false,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Matcher for PathPattern {
    fn matches(&self, path: &NormalizedPath) -> bool {
        if self.match_all {
            return true;
        }

        let mut actual = path.segments();
        for expected in &self.segments {
            match (expected, actual.next()) {
                (_, None) => return false,
                (Segment::Literal(lit), Some(seg)) if lit != seg => return false,
                _ => {}
            }
        }

        self.open_tail || actual.next().is_none()
    }
}

/// Combines patterns with OR semantics. An empty set matches nothing.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<PathPattern>,
}

impl PatternSet {
    pub fn new(patterns: Vec<PathPattern>) -> Self {
        Self { patterns }
    }

    /// Parse every raw pattern, failing on the first invalid one.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, PatternError> {
        raw.iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }
}

impl Matcher for PatternSet {
    fn matches(&self, path: &NormalizedPath) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}
