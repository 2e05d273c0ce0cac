//! Identity collaborator boundary.
//!
//! # Data Flow
//! ```text
//! Request parts (cookies, authorization, trusted headers)
//!     → IdentityResolver (http.rs or headers.rs)
//!     → lookup_session (deadline, logging, metrics)
//!     → SessionLookup::Resolved | SessionLookup::Unavailable
//! ```
//!
//! # Design Decisions
//! - The gate never verifies credentials itself; resolvers are opaque
//! - Every failure kind collapses to `Unavailable`, which the decision
//!   engine evaluates as anonymous
//! - Resolvers return boxed futures so they can live behind `Arc<dyn _>`

pub mod headers;
pub mod http;

use axum::http::request::Parts;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::access::{SessionLookup, SessionState};
use crate::config::{IdentityConfig, IdentityMode};
use crate::observability::metrics;
use crate::resilience::with_deadline;

pub use self::headers::TrustedHeaderResolver;
pub use self::http::HttpIdentityResolver;

/// Why a session could not be resolved.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity service unreachable: {0}")]
    Transport(String),

    #[error("identity service answered with status {0}")]
    Status(u16),

    #[error("identity response malformed: {0}")]
    Malformed(String),

    #[error("identity lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid identity configuration: {0}")]
    Config(String),
}

/// Resolves the session state of an incoming request.
pub trait IdentityResolver: Send + Sync {
    fn resolve<'a>(&'a self, parts: &'a Parts) -> BoxFuture<'a, Result<SessionState, IdentityError>>;
}

/// Build the resolver selected by configuration.
pub fn from_config(config: &IdentityConfig) -> Result<Arc<dyn IdentityResolver>, IdentityError> {
    match config.mode {
        IdentityMode::Http => Ok(Arc::new(HttpIdentityResolver::new(&config.endpoint)?)),
        IdentityMode::Headers => Ok(Arc::new(TrustedHeaderResolver::new(
            &config.user_header,
            &config.tenant_header,
        )?)),
    }
}

/// Ask the resolver for the caller's session, bounded by `deadline`.
///
/// Never fails: any error is reported as `SessionLookup::Unavailable`.
pub async fn lookup_session(
    resolver: &dyn IdentityResolver,
    parts: &Parts,
    deadline: Duration,
    request_id: &str,
) -> SessionLookup {
    let started = Instant::now();

    let outcome = match with_deadline(deadline, resolver.resolve(parts)).await {
        Ok(result) => result,
        Err(exceeded) => Err(IdentityError::Timeout(exceeded.0)),
    };

    match outcome {
        Ok(session) => {
            metrics::record_identity_lookup("resolved", started);
            tracing::debug!(request_id = %request_id, session = session.label(), "Session resolved");
            SessionLookup::Resolved(session)
        }
        Err(e) => {
            metrics::record_identity_lookup("unavailable", started);
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Identity unavailable, treating caller as anonymous"
            );
            SessionLookup::unavailable(e.to_string())
        }
    }
}
