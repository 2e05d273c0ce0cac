//! Caller session state as seen by the gate.

use serde::Serialize;

/// Identifier of the caller's active tenant (organization).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TenantId(String);

impl TenantId {
    /// Returns `None` for blank ids so that an empty string never counts as a tenant.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication and tenant-selection state of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    Authenticated { tenant: Option<TenantId> },
}

impl SessionState {
    /// Build from the collaborator's `{authenticated, tenantId}` shape.
    ///
    /// A tenant without authentication collapses to `Anonymous`.
    pub fn from_parts(authenticated: bool, tenant_id: Option<String>) -> Self {
        if !authenticated {
            return SessionState::Anonymous;
        }
        SessionState::Authenticated {
            tenant: tenant_id.and_then(TenantId::new),
        }
    }

    pub fn with_tenant(tenant_id: impl Into<String>) -> Self {
        Self::from_parts(true, Some(tenant_id.into()))
    }

    pub fn without_tenant() -> Self {
        SessionState::Authenticated { tenant: None }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn tenant(&self) -> Option<&TenantId> {
        match self {
            SessionState::Authenticated { tenant } => tenant.as_ref(),
            SessionState::Anonymous => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated { tenant: None } => "no_tenant",
            SessionState::Authenticated { tenant: Some(_) } => "tenant",
        }
    }
}

/// Outcome of asking the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    Resolved(SessionState),
    /// Collaborator failed, timed out or answered garbage.
    Unavailable { reason: String },
}

impl SessionLookup {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        SessionLookup::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SessionLookup::Resolved(_))
    }
}

impl From<SessionState> for SessionLookup {
    fn from(state: SessionState) -> Self {
        SessionLookup::Resolved(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(SessionState::from_parts(false, None), SessionState::Anonymous);
        assert_eq!(
            SessionState::from_parts(true, None),
            SessionState::Authenticated { tenant: None }
        );
        assert_eq!(
            SessionState::from_parts(true, Some("t1".into())).tenant().map(TenantId::as_str),
            Some("t1")
        );
    }

    #[test]
    fn test_tenant_without_authentication_never_escalates() {
        let state = SessionState::from_parts(false, Some("t1".into()));
        assert_eq!(state, SessionState::Anonymous);
        assert!(state.tenant().is_none());
    }

    #[test]
    fn test_blank_tenant_is_no_tenant() {
        assert_eq!(
            SessionState::from_parts(true, Some("  ".into())),
            SessionState::without_tenant()
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(SessionState::Anonymous.label(), "anonymous");
        assert_eq!(SessionState::without_tenant().label(), "no_tenant");
        assert_eq!(SessionState::with_tenant("t1").label(), "tenant");
    }
}
