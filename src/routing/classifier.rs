//! Route classification.
//!
//! # Responsibilities
//! - Hold the compiled pattern set of each gated category
//! - Map a request path to exactly one `RouteCategory`
//!
//! # Design Decisions
//! - Fixed priority: Protected, AuthPages, TenantSelection, then Public
//! - Public is the fallback, never a pattern list
//! - Unnormalizable paths classify as Public (they never gain privilege)
//! - Immutable after construction (thread-safe without locks)

use serde::Serialize;

use crate::config::schema::RoutesConfig;
use crate::routing::matcher::{Matcher, PatternError, PatternSet};
use crate::routing::normalize::NormalizedPath;

/// The category a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCategory {
    /// Requires authentication and a selected tenant.
    Protected,
    /// Sign-in and sign-up flows.
    AuthPages,
    /// The waypoint between login and dashboard.
    TenantSelection,
    Public,
}

impl RouteCategory {
    pub const ALL: [RouteCategory; 4] = [
        RouteCategory::Protected,
        RouteCategory::AuthPages,
        RouteCategory::TenantSelection,
        RouteCategory::Public,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteCategory::Protected => "protected",
            RouteCategory::AuthPages => "auth_pages",
            RouteCategory::TenantSelection => "tenant_selection",
            RouteCategory::Public => "public",
        }
    }
}

impl std::fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies paths against the configured category patterns.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    protected: PatternSet,
    auth_pages: PatternSet,
    tenant_selection: PatternSet,
}

impl RouteClassifier {
    pub fn new(protected: PatternSet, auth_pages: PatternSet, tenant_selection: PatternSet) -> Self {
        Self {
            protected,
            auth_pages,
            tenant_selection,
        }
    }

    /// Compile the pattern lists from configuration.
    pub fn from_config(routes: &RoutesConfig) -> Result<Self, PatternError> {
        Ok(Self::new(
            PatternSet::parse(&routes.protected)?,
            PatternSet::parse(&routes.auth_pages)?,
            PatternSet::parse(&routes.tenant_selection)?,
        ))
    }

    /// Classify a raw request target. Total: every input yields a category.
    pub fn classify(&self, raw: &str) -> RouteCategory {
        match NormalizedPath::parse(raw) {
            Ok(path) => self.classify_normalized(&path),
            Err(_) => RouteCategory::Public,
        }
    }

    pub fn classify_normalized(&self, path: &NormalizedPath) -> RouteCategory {
        if self.protected.matches(path) {
            RouteCategory::Protected
        } else if self.auth_pages.matches(path) {
            RouteCategory::AuthPages
        } else if self.tenant_selection.matches(path) {
            RouteCategory::TenantSelection
        } else {
            RouteCategory::Public
        }
    }
}
