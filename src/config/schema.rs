//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the access-control gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream application that receives allowed requests.
    pub upstream: UpstreamConfig,

    /// Path patterns for each gated route category.
    pub routes: RoutesConfig,

    /// Redirect targets used when a request is denied.
    pub redirects: RedirectsConfig,

    /// Identity collaborator settings.
    pub identity: IdentityConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Downstream application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Route category patterns. Anything unmatched is public.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Routes requiring authentication and a selected tenant.
    pub protected: Vec<String>,

    /// Sign-in / sign-up flows.
    pub auth_pages: Vec<String>,

    /// Tenant selection and creation pages.
    pub tenant_selection: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            protected: vec!["/dashboard/*".to_string()],
            auth_pages: vec!["/sign-in/*".to_string(), "/sign-up/*".to_string()],
            tenant_selection: vec!["/select-org".to_string(), "/create-org".to_string()],
        }
    }
}

/// Redirect targets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectsConfig {
    /// Where unauthenticated callers are sent.
    pub auth_entry: String,

    /// Where authenticated callers without a tenant are sent.
    pub tenant_selection: String,

    /// Dashboard root for fully authenticated callers.
    pub dashboard: String,

    /// Query parameter carrying the originally requested path to the auth entry.
    pub return_param: String,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            auth_entry: "/sign-in".to_string(),
            tenant_selection: "/select-org".to_string(),
            dashboard: "/dashboard".to_string(),
            return_param: "redirect_url".to_string(),
        }
    }
}

/// How the gate learns who the caller is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// Ask a session endpoint over HTTP.
    #[default]
    Http,
    /// Trust headers set by an authenticating proxy in front of the gate.
    Headers,
}

/// Identity collaborator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub mode: IdentityMode,

    /// Session endpoint URL (http mode).
    pub endpoint: String,

    /// Upper bound on a single session lookup in milliseconds.
    pub timeout_ms: u64,

    /// Header carrying the authenticated user id (headers mode).
    pub user_header: String,

    /// Header carrying the active tenant id (headers mode).
    pub tenant_header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::Http,
            endpoint: "http://127.0.0.1:4000/session".to_string(),
            timeout_ms: 500,
            user_header: "x-auth-user".to_string(),
            tenant_header: "x-auth-tenant".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
