//! Session lookup from headers set by an authenticating proxy.
//!
//! Only safe when the gate is reachable exclusively through that proxy,
//! which must strip any client-supplied copies of these headers.

use axum::http::request::Parts;
use axum::http::HeaderName;
use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::access::SessionState;
use crate::identity::{IdentityError, IdentityResolver};

#[derive(Debug, Clone)]
pub struct TrustedHeaderResolver {
    user_header: HeaderName,
    tenant_header: HeaderName,
}

impl TrustedHeaderResolver {
    pub fn new(user_header: &str, tenant_header: &str) -> Result<Self, IdentityError> {
        let parse = |raw: &str| {
            HeaderName::from_bytes(raw.as_bytes())
                .map_err(|e| IdentityError::Config(format!("{raw}: {e}")))
        };
        Ok(Self {
            user_header: parse(user_header)?,
            tenant_header: parse(tenant_header)?,
        })
    }

    fn read(&self, parts: &Parts) -> Result<SessionState, IdentityError> {
        let header = |name: &HeaderName| -> Result<Option<String>, IdentityError> {
            parts
                .headers
                .get(name)
                .map(|v| {
                    v.to_str()
                        .map(|s| s.trim().to_string())
                        .map_err(|_| IdentityError::Malformed(format!("{name} is not valid UTF-8")))
                })
                .transpose()
        };

        let user = header(&self.user_header)?.filter(|u| !u.is_empty());
        let tenant = header(&self.tenant_header)?;
        Ok(SessionState::from_parts(user.is_some(), tenant))
    }
}

impl IdentityResolver for TrustedHeaderResolver {
    fn resolve<'a>(&'a self, parts: &'a Parts) -> BoxFuture<'a, Result<SessionState, IdentityError>> {
        future::ready(self.read(parts)).boxed()
    }
}
