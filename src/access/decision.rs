//! The access decision table.
//!
//! | Category        | anonymous                      | no tenant                 | tenant             |
//! |-----------------|--------------------------------|---------------------------|--------------------|
//! | Protected       | AuthEntry (keep return target) | TenantSelection           | Allow              |
//! | AuthPages       | Allow                          | TenantSelection           | Dashboard          |
//! | TenantSelection | AuthEntry                      | Allow                     | Dashboard          |
//! | Public          | Allow                          | Allow                     | Allow              |
//!
//! Pure functions only. Paths are resolved later by `RedirectPaths`.

use serde::Serialize;

use crate::access::session::{SessionLookup, SessionState};
use crate::routing::RouteCategory;

/// Symbolic redirect destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum RedirectTarget {
    /// Sign-in entry point. `keep_return` asks for the requested path to be
    /// carried along so the caller lands back there afterwards.
    AuthEntry { keep_return: bool },
    TenantSelection,
    Dashboard,
}

impl RedirectTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectTarget::AuthEntry { .. } => "auth_entry",
            RedirectTarget::TenantSelection => "tenant_selection",
            RedirectTarget::Dashboard => "dashboard",
        }
    }
}

/// What to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    RedirectTo(RedirectTarget),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::RedirectTo(target) => target.as_str(),
        }
    }
}

/// Evaluate the decision table for a known session.
pub fn decide(category: RouteCategory, session: &SessionState) -> Decision {
    use Decision::{Allow, RedirectTo};
    use RedirectTarget::{AuthEntry, Dashboard, TenantSelection};

    match (category, session) {
        (RouteCategory::Public, _) => Allow,

        (RouteCategory::Protected, SessionState::Anonymous) => {
            RedirectTo(AuthEntry { keep_return: true })
        }
        (RouteCategory::Protected, SessionState::Authenticated { tenant: None }) => {
            RedirectTo(TenantSelection)
        }
        (RouteCategory::Protected, SessionState::Authenticated { tenant: Some(_) }) => Allow,

        (RouteCategory::AuthPages, SessionState::Anonymous) => Allow,
        (RouteCategory::AuthPages, SessionState::Authenticated { tenant: None }) => {
            RedirectTo(TenantSelection)
        }
        (RouteCategory::AuthPages, SessionState::Authenticated { tenant: Some(_) }) => {
            RedirectTo(Dashboard)
        }

        (RouteCategory::TenantSelection, SessionState::Anonymous) => {
            RedirectTo(AuthEntry { keep_return: false })
        }
        (RouteCategory::TenantSelection, SessionState::Authenticated { tenant: None }) => Allow,
        (RouteCategory::TenantSelection, SessionState::Authenticated { tenant: Some(_) }) => {
            RedirectTo(Dashboard)
        }
    }
}

/// Evaluate the decision table for a lookup outcome.
///
/// An unavailable identity collaborator is evaluated as `Anonymous`.
pub fn decide_lookup(category: RouteCategory, lookup: &SessionLookup) -> Decision {
    match lookup {
        SessionLookup::Resolved(session) => decide(category, session),
        SessionLookup::Unavailable { .. } => decide(category, &SessionState::Anonymous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_always_allows() {
        for session in [
            SessionState::Anonymous,
            SessionState::without_tenant(),
            SessionState::with_tenant("t1"),
        ] {
            assert_eq!(decide(RouteCategory::Public, &session), Decision::Allow);
        }
        assert_eq!(
            decide_lookup(RouteCategory::Public, &SessionLookup::unavailable("down")),
            Decision::Allow
        );
    }

    #[test]
    fn test_protected_requires_tenant() {
        assert_eq!(
            decide(RouteCategory::Protected, &SessionState::Anonymous),
            Decision::RedirectTo(RedirectTarget::AuthEntry { keep_return: true })
        );
        assert_eq!(
            decide(RouteCategory::Protected, &SessionState::without_tenant()),
            Decision::RedirectTo(RedirectTarget::TenantSelection)
        );
        assert!(decide(RouteCategory::Protected, &SessionState::with_tenant("t1")).is_allow());
    }

    #[test]
    fn test_unavailable_fails_closed() {
        let lookup = SessionLookup::unavailable("timeout");
        assert_eq!(
            decide_lookup(RouteCategory::Protected, &lookup),
            Decision::RedirectTo(RedirectTarget::AuthEntry { keep_return: true })
        );
        assert_eq!(
            decide_lookup(RouteCategory::TenantSelection, &lookup),
            Decision::RedirectTo(RedirectTarget::AuthEntry { keep_return: false })
        );
        assert!(decide_lookup(RouteCategory::AuthPages, &lookup).is_allow());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Decision::Allow.outcome(), "allow");
        assert_eq!(
            Decision::RedirectTo(RedirectTarget::AuthEntry { keep_return: true }).outcome(),
            "auth_entry"
        );
        assert_eq!(Decision::RedirectTo(RedirectTarget::Dashboard).outcome(), "dashboard");
    }
}
