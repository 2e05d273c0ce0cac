//! Shared utilities for gate integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, request::Parts, HeaderMap, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use tenant_gate::access::{AccessPolicy, SessionState};
use tenant_gate::config::GateConfig;
use tenant_gate::http::{gate_middleware, GateState};
use tenant_gate::identity::{IdentityError, IdentityResolver, TrustedHeaderResolver};

/// Resolver answering the same thing for every request.
pub struct StaticResolver(pub Option<SessionState>);

impl IdentityResolver for StaticResolver {
    fn resolve<'a>(&'a self, _parts: &'a Parts) -> BoxFuture<'a, Result<SessionState, IdentityError>> {
        let out = self
            .0
            .clone()
            .ok_or_else(|| IdentityError::Transport("connection refused".into()));
        async move { out }.boxed()
    }
}

/// Resolver that never answers. Records whether its future was started and dropped.
#[derive(Default)]
pub struct HangingResolver {
    pub started: Arc<AtomicBool>,
    pub dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl IdentityResolver for HangingResolver {
    fn resolve<'a>(&'a self, _parts: &'a Parts) -> BoxFuture<'a, Result<SessionState, IdentityError>> {
        let started = self.started.clone();
        let dropped = self.dropped.clone();
        async move {
            let _guard = DropFlag(dropped);
            started.store(true, Ordering::SeqCst);
            std::future::pending::<()>().await;
            Ok(SessionState::with_tenant("never"))
        }
        .boxed()
    }
}

/// Resolver reading `x-auth-user` / `x-auth-tenant` from the request.
pub fn header_resolver() -> Arc<dyn IdentityResolver> {
    Arc::new(TrustedHeaderResolver::new("x-auth-user", "x-auth-tenant").unwrap())
}

pub fn gate_state(resolver: Arc<dyn IdentityResolver>, identity_timeout: Duration) -> GateState {
    let policy = AccessPolicy::from_config(&GateConfig::default()).unwrap();
    GateState::new(policy, resolver, identity_timeout)
}

/// Downstream stand-in: echoes what it received and counts calls.
pub async fn echo(State(hits): State<Arc<AtomicUsize>>, request: Request<Body>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, 1024 * 1024).await.unwrap_or_default();
    let custom = parts
        .headers
        .get("x-custom")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    format!(
        "{} {} custom={} body={}",
        parts.method,
        parts.uri,
        custom,
        String::from_utf8_lossy(&body)
    )
    .into_response()
}

/// An in-process app: gate middleware in front of the echo handler.
pub fn gated_app(state: GateState) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .fallback(echo)
        .with_state(hits.clone())
        .layer(middleware::from_fn_with_state(state, gate_middleware));
    (app, hits)
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Start a mock application server on an ephemeral port.
pub async fn start_mock_upstream() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().fallback(echo).with_state(hits.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, hits)
}

/// Start a mock session endpoint at `/session`.
///
/// The session is taken from a `session` cookie: `anon`, `user`, or `tenant-<id>`.
/// Anything else gets a 500.
pub async fn start_identity_service() -> SocketAddr {
    async fn session(headers: HeaderMap) -> Response {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|c| c.strip_prefix("session="))
            .unwrap_or("anon")
            .to_string();

        match cookie.as_str() {
            "anon" => Json(serde_json::json!({ "authenticated": false })).into_response(),
            "user" => Json(serde_json::json!({ "authenticated": true, "tenant_id": null }))
                .into_response(),
            c if c.starts_with("tenant-") => Json(serde_json::json!({
                "authenticated": true,
                "tenant_id": c.trim_start_matches("tenant-"),
            }))
            .into_response(),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        }
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/session", get(session));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
