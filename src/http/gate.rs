//! Access gate middleware.
//!
//! Runs once per request, in a fixed order:
//! 1. resolve the caller's session (the only suspension point)
//! 2. classify the request target against the active policy
//! 3. decide, then redirect or forward the request unchanged
//!
//! If the client goes away while step 1 is pending, the middleware future is
//! dropped together with the lookup and no response is produced.

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;

use crate::access::AccessPolicy;
use crate::http::request::RequestIdExt;
use crate::http::response;
use crate::identity::{lookup_session, IdentityResolver};
use crate::observability::metrics;

/// State required by the gate.
#[derive(Clone)]
pub struct GateState {
    /// Swapped atomically on config reload; each request reads one snapshot.
    pub policy: Arc<ArcSwap<AccessPolicy>>,
    pub identity: Arc<dyn IdentityResolver>,
    pub identity_timeout: Duration,
}

impl GateState {
    pub fn new(
        policy: AccessPolicy,
        identity: Arc<dyn IdentityResolver>,
        identity_timeout: Duration,
    ) -> Self {
        Self {
            policy: Arc::new(ArcSwap::from_pointee(policy)),
            identity,
            identity_timeout,
        }
    }

    /// Install a new policy for subsequent requests.
    pub fn replace_policy(&self, policy: AccessPolicy) {
        self.policy.store(Arc::new(policy));
    }
}

pub async fn gate_middleware(
    State(state): State<GateState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();
    let request_id = parts.request_id().to_string();

    let lookup = lookup_session(
        state.identity.as_ref(),
        &parts,
        state.identity_timeout,
        &request_id,
    )
    .await;

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let verdict = state.policy.load().evaluate(target, &lookup);
    metrics::record_decision(verdict.category, &verdict.decision);

    match verdict.location {
        Some(location) => {
            tracing::info!(
                request_id = %request_id,
                path = %parts.uri.path(),
                category = %verdict.category,
                decision = verdict.decision.outcome(),
                location = %location,
                "Request redirected"
            );
            response::redirect(&location)
        }
        None => {
            tracing::debug!(
                request_id = %request_id,
                path = %parts.uri.path(),
                category = %verdict.category,
                "Request allowed"
            );
            next.run(Request::from_parts(parts, body)).await
        }
    }
}
