//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router: gate middleware in front of the upstream forwarder
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Apply policy reloads while serving
//! - Drain on shutdown

use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::access::AccessPolicy;
use crate::config::GateConfig;
use crate::http::gate::{gate_middleware, GateState};
use crate::http::proxy::{forward, UpstreamState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::identity::{self, IdentityError, IdentityResolver};
use crate::routing::PatternError;

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route pattern: {0}")]
    Policy(#[from] PatternError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("invalid upstream address {address:?}: {source}")]
    Upstream {
        address: String,
        source: axum::http::uri::InvalidUri,
    },
}

/// HTTP server for the access gate.
pub struct GateServer {
    config: GateConfig,
    gate: GateState,
    upstream: UpstreamState,
}

impl GateServer {
    /// Create a server with the identity resolver selected by configuration.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let resolver = identity::from_config(&config.identity)?;
        Self::with_resolver(config, resolver)
    }

    /// Create a server with a caller-supplied identity resolver.
    pub fn with_resolver(
        config: GateConfig,
        resolver: Arc<dyn IdentityResolver>,
    ) -> Result<Self, ServerError> {
        let policy = AccessPolicy::from_config(&config)?;
        let gate = GateState::new(
            policy,
            resolver,
            Duration::from_millis(config.identity.timeout_ms),
        );
        let upstream =
            UpstreamState::new(&config.upstream.address).map_err(|source| ServerError::Upstream {
                address: config.upstream.address.clone(),
                source,
            })?;

        Ok(Self {
            config,
            gate,
            upstream,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(forward)
            .with_state(self.upstream.clone())
            .layer(middleware::from_fn_with_state(self.gate.clone(), gate_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    pub fn gate_state(&self) -> &GateState {
        &self.gate
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Serve until a shutdown signal arrives.
    ///
    /// Every config received on `config_updates` replaces the active policy.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "Access gate starting"
        );

        let gate = self.gate.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match AccessPolicy::from_config(&config) {
                    Ok(policy) => {
                        gate.replace_policy(policy);
                        tracing::info!("Access policy replaced");
                    }
                    Err(e) => tracing::error!(error = %e, "Rejected access policy update"),
                }
            }
        });

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("Access gate stopped");
        Ok(())
    }
}
