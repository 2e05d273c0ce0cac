//! Access-control routing gate for a multi-tenant booking dashboard.
//!
//! Every request is classified into a route category, checked against the
//! caller's authentication and tenant selection, and either forwarded to the
//! application or redirected to the step the caller is missing.

pub mod access;
pub mod config;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use access::{AccessPolicy, Decision, RedirectTarget, SessionLookup, SessionState, Verdict};
pub use config::GateConfig;
pub use http::GateServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteCategory, RouteClassifier};
