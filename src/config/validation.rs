//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route pattern and redirect path is well-formed
//! - Check redirect targets land in the category they serve, so a
//!   redirect can never bounce back into another denial
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::uri::Authority;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{GateConfig, IdentityMode};
use crate::routing::{NormalizedPath, PatternError, PatternSet, RouteCategory, RouteClassifier};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routes.{category}: {source}")]
    InvalidPattern {
        category: &'static str,
        source: PatternError,
    },

    #[error("redirects.{field}: {path:?} is not a canonical absolute path")]
    InvalidRedirectPath { field: &'static str, path: String },

    #[error("redirects.{field}: {path:?} classifies as {actual}, expected {expected}")]
    RedirectCategoryMismatch {
        field: &'static str,
        path: String,
        expected: RouteCategory,
        actual: RouteCategory,
    },

    #[error("redirects.return_param must not be empty")]
    EmptyReturnParam,

    #[error("identity.timeout_ms must be greater than zero")]
    ZeroIdentityTimeout,

    #[error("identity.endpoint {0:?} is not a valid URL")]
    InvalidIdentityEndpoint(String),

    #[error("identity.{field}: {value:?} is not a valid header name")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("{field}: {value:?} is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.address: {0:?} is not a valid host:port authority")]
    InvalidUpstream(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a parsed configuration, collecting every error found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let routes = [
        ("protected", &config.routes.protected),
        ("auth_pages", &config.routes.auth_pages),
        ("tenant_selection", &config.routes.tenant_selection),
    ];
    for (category, patterns) in routes {
        for raw in patterns {
            if let Err(source) = PatternSet::parse(std::slice::from_ref(raw)) {
                errors.push(ValidationError::InvalidPattern { category, source });
            }
        }
    }

    let redirects = [
        ("auth_entry", &config.redirects.auth_entry, RouteCategory::AuthPages),
        (
            "tenant_selection",
            &config.redirects.tenant_selection,
            RouteCategory::TenantSelection,
        ),
        ("dashboard", &config.redirects.dashboard, RouteCategory::Protected),
    ];
    let mut canonical = Vec::new();
    for (field, path, expected) in redirects {
        if is_canonical_path(path) {
            canonical.push((field, path, expected));
        } else {
            errors.push(ValidationError::InvalidRedirectPath {
                field,
                path: path.clone(),
            });
        }
    }

    // Only meaningful when every pattern compiled.
    if let Ok(classifier) = RouteClassifier::from_config(&config.routes) {
        for (field, path, expected) in canonical {
            let actual = classifier.classify(path);
            if actual != expected {
                errors.push(ValidationError::RedirectCategoryMismatch {
                    field,
                    path: path.clone(),
                    expected,
                    actual,
                });
            }
        }
    }

    if config.redirects.return_param.trim().is_empty() {
        errors.push(ValidationError::EmptyReturnParam);
    }

    if config.identity.timeout_ms == 0 {
        errors.push(ValidationError::ZeroIdentityTimeout);
    }
    match config.identity.mode {
        IdentityMode::Http => {
            if url::Url::parse(&config.identity.endpoint).is_err() {
                errors.push(ValidationError::InvalidIdentityEndpoint(
                    config.identity.endpoint.clone(),
                ));
            }
        }
        IdentityMode::Headers => {
            let headers = [
                ("user_header", &config.identity.user_header),
                ("tenant_header", &config.identity.tenant_header),
            ];
            for (field, value) in headers {
                if axum::http::HeaderName::from_bytes(value.as_bytes()).is_err() {
                    errors.push(ValidationError::InvalidHeaderName {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if !is_upstream_authority(&config.upstream.address) {
        errors.push(ValidationError::InvalidUpstream(config.upstream.address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` or `ip:port`; hostnames are resolved when connecting.
fn is_upstream_authority(value: &str) -> bool {
    match value.parse::<Authority>() {
        Ok(authority) => !authority.as_str().contains('@') && !authority.host().is_empty(),
        Err(_) => false,
    }
}

/// A redirect path must already be in normalized form and safe to place in a
/// `Location` header as-is.
fn is_canonical_path(path: &str) -> bool {
    let printable = path.bytes().all(|b| b.is_ascii_graphic());
    printable
        && NormalizedPath::parse(path)
            .map(|p| p.as_str() == path)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GateConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GateConfig::default();
        config.routes.auth_pages.push("/log*in".into());
        config.redirects.return_param = " ".into();
        config.identity.timeout_ms = 0;
        config.upstream.address = "not an address".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(
            errors[0],
            ValidationError::InvalidPattern { category: "auth_pages", .. }
        ));
        assert!(errors.contains(&ValidationError::EmptyReturnParam));
        assert!(errors.contains(&ValidationError::ZeroIdentityTimeout));
    }

    #[test]
    fn test_redirect_must_be_canonical() {
        let mut config = GateConfig::default();
        config.redirects.dashboard = "/dashboard/".into();
        config.redirects.auth_entry = "https://evil.example/sign-in".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::InvalidRedirectPath { .. })));
    }

    #[test]
    fn test_redirect_category_mismatch() {
        let mut config = GateConfig::default();
        // Sending unauthenticated users to a protected page would loop.
        config.redirects.auth_entry = "/dashboard/login".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::RedirectCategoryMismatch {
                field: "auth_entry",
                path: "/dashboard/login".into(),
                expected: RouteCategory::AuthPages,
                actual: RouteCategory::Protected,
            }]
        );
    }

    #[test]
    fn test_identity_mode_specific_checks() {
        let mut config = GateConfig::default();
        config.identity.endpoint = "not a url".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidIdentityEndpoint("not a url".into())])
        );

        config.identity.mode = IdentityMode::Headers;
        config.identity.tenant_header = "bad header".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidHeaderName { field: "tenant_header", .. }]
        ));
    }

    #[test]
    fn test_upstream_accepts_hostnames() {
        let mut config = GateConfig::default();
        for address in ["app:3000", "127.0.0.1:3000", "[::1]:3000", "app.internal"] {
            config.upstream.address = address.into();
            assert_eq!(validate_config(&config), Ok(()), "{address}");
        }

        for address in ["", "app/x", "user@app:3000", "http://app:3000"] {
            config.upstream.address = address.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::InvalidUpstream(address.into())]),
                "{address}"
            );
        }
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = GateConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_err());

        config.observability.metrics_enabled = false;
        assert!(validate_config(&config).is_ok());
    }
}
