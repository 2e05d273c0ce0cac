//! Session lookup against an HTTP session endpoint.
//!
//! The endpoint receives the caller's `Cookie` and `Authorization` headers
//! and answers `{"authenticated": bool, "tenant_id": string | null}`.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Deserialize;
use url::Url;

use crate::access::SessionState;
use crate::identity::{IdentityError, IdentityResolver};

/// Wire shape of the session endpoint's answer.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    authenticated: bool,
    #[serde(default, alias = "tenantId", alias = "org_id", alias = "orgId")]
    tenant_id: Option<String>,
}

/// Resolves sessions by calling a remote endpoint.
#[derive(Debug, Clone)]
pub struct HttpIdentityResolver {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpIdentityResolver {
    pub fn new(endpoint: &str) -> Result<Self, IdentityError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| IdentityError::Config(format!("{endpoint}: {e}")))?;
        // The session endpoint is an internal service; never route it through an egress proxy.
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| IdentityError::Config(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self, parts: &Parts) -> Result<SessionState, IdentityError> {
        let mut request = self.client.get(self.endpoint.clone());
        for name in [COOKIE, AUTHORIZATION] {
            for value in parts.headers.get_all(&name) {
                request = request.header(name.clone(), value.clone());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Malformed(e.to_string()))?;

        Ok(SessionState::from_parts(body.authenticated, body.tenant_id))
    }
}

impl IdentityResolver for HttpIdentityResolver {
    fn resolve<'a>(&'a self, parts: &'a Parts) -> BoxFuture<'a, Result<SessionState, IdentityError>> {
        self.fetch(parts).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_response_shapes() {
        let r: SessionResponse =
            serde_json::from_str(r#"{"authenticated": true, "tenant_id": "t1"}"#).unwrap();
        assert_eq!(
            SessionState::from_parts(r.authenticated, r.tenant_id),
            SessionState::with_tenant("t1")
        );

        let r: SessionResponse =
            serde_json::from_str(r#"{"authenticated": true, "orgId": "acme"}"#).unwrap();
        assert_eq!(r.tenant_id.as_deref(), Some("acme"));

        let r: SessionResponse = serde_json::from_str(r#"{"authenticated": false}"#).unwrap();
        assert_eq!(SessionState::from_parts(r.authenticated, r.tenant_id), SessionState::Anonymous);

        assert!(serde_json::from_str::<SessionResponse>(r#"{"tenant_id": "t1"}"#).is_err());
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(matches!(
            HttpIdentityResolver::new("not a url"),
            Err(IdentityError::Config(_))
        ));
        let ok = HttpIdentityResolver::new("http://127.0.0.1:4000/session").unwrap();
        assert_eq!(ok.endpoint().path(), "/session");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is not listening on loopback in test environments.
        let resolver = HttpIdentityResolver::new("http://127.0.0.1:9/session").unwrap();
        let parts = axum::http::Request::builder()
            .uri("/dashboard")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let err = resolver.resolve(&parts).await.unwrap_err();
        assert!(matches!(err, IdentityError::Transport(_)));
    }
}
