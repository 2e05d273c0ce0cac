//! A compiled access policy: classifier plus redirect paths.

use serde::Serialize;

use crate::access::decision::{decide_lookup, Decision};
use crate::access::redirect::RedirectPaths;
use crate::access::session::SessionLookup;
use crate::config::schema::GateConfig;
use crate::routing::{PatternError, RouteCategory, RouteClassifier};

/// Full outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub category: RouteCategory,
    pub decision: Decision,
    /// Set exactly when `decision` is a redirect.
    pub location: Option<String>,
}

/// Immutable policy snapshot shared by all in-flight requests.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    classifier: RouteClassifier,
    redirects: RedirectPaths,
}

impl AccessPolicy {
    pub fn new(classifier: RouteClassifier, redirects: RedirectPaths) -> Self {
        Self {
            classifier,
            redirects,
        }
    }

    pub fn from_config(config: &GateConfig) -> Result<Self, PatternError> {
        Ok(Self::new(
            RouteClassifier::from_config(&config.routes)?,
            RedirectPaths::from_config(&config.redirects),
        ))
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn redirects(&self) -> &RedirectPaths {
        &self.redirects
    }

    /// Classify, then decide. `target` is the request path with optional query.
    pub fn evaluate(&self, target: &str, lookup: &SessionLookup) -> Verdict {
        let category = self.classifier.classify(target);
        let decision = decide_lookup(category, lookup);
        let location = match decision {
            Decision::Allow => None,
            Decision::RedirectTo(to) => Some(self.redirects.location(to, target)),
        };
        Verdict {
            category,
            decision,
            location,
        }
    }
}
