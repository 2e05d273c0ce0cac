//! Resolution of symbolic redirect targets into `Location` values.

use url::form_urlencoded;

use crate::access::decision::RedirectTarget;
use crate::config::schema::RedirectsConfig;
use crate::routing::NormalizedPath;

/// Configured redirect paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPaths {
    auth_entry: String,
    tenant_selection: String,
    dashboard: String,
    return_param: String,
}

impl RedirectPaths {
    pub fn from_config(config: &RedirectsConfig) -> Self {
        Self {
            auth_entry: config.auth_entry.clone(),
            tenant_selection: config.tenant_selection.clone(),
            dashboard: config.dashboard.clone(),
            return_param: config.return_param.clone(),
        }
    }

    pub fn return_param(&self) -> &str {
        &self.return_param
    }

    /// Build the `Location` for a target.
    ///
    /// `requested` is the original request target (path and optional query).
    /// The return value carried to the auth entry is rebuilt from its
    /// normalized path, so it is always a same-origin absolute path: `//host`
    /// style targets collapse to `/host` and cannot become open redirects.
    pub fn location(&self, target: RedirectTarget, requested: &str) -> String {
        match target {
            RedirectTarget::AuthEntry { keep_return: true } => match return_target(requested) {
                Some(back) => {
                    let query = form_urlencoded::Serializer::new(String::new())
                        .append_pair(&self.return_param, &back)
                        .finish();
                    format!("{}?{}", self.auth_entry, query)
                }
                None => self.auth_entry.clone(),
            },
            RedirectTarget::AuthEntry { keep_return: false } => self.auth_entry.clone(),
            RedirectTarget::TenantSelection => self.tenant_selection.clone(),
            RedirectTarget::Dashboard => self.dashboard.clone(),
        }
    }
}

impl Default for RedirectPaths {
    fn default() -> Self {
        Self::from_config(&RedirectsConfig::default())
    }
}

/// The normalized requested path plus its original query, if any.
fn return_target(requested: &str) -> Option<String> {
    let without_fragment = requested.split('#').next().unwrap_or_default();
    let path = NormalizedPath::parse(without_fragment).ok()?;
    match without_fragment.split_once('?') {
        Some((_, query)) if !query.is_empty() => Some(format!("{}?{}", path, query)),
        _ => Some(path.to_string()),
    }
}

/// Extract the return target carried by an auth-entry `Location`.
pub fn extract_return_target(location: &str, return_param: &str) -> Option<String> {
    let (_, query) = location.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == return_param)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_entry_keeps_return_target() {
        let paths = RedirectPaths::default();
        let location = paths.location(
            RedirectTarget::AuthEntry { keep_return: true },
            "/dashboard/bookings",
        );

        assert_eq!(location, "/sign-in?redirect_url=%2Fdashboard%2Fbookings");
        assert_eq!(
            extract_return_target(&location, "redirect_url").as_deref(),
            Some("/dashboard/bookings")
        );
    }

    #[test]
    fn test_return_target_keeps_query() {
        let paths = RedirectPaths::default();
        let location = paths.location(
            RedirectTarget::AuthEntry { keep_return: true },
            "/dashboard/bookings?status=open&page=2#top",
        );

        assert_eq!(
            extract_return_target(&location, "redirect_url").as_deref(),
            Some("/dashboard/bookings?status=open&page=2")
        );
    }

    #[test]
    fn test_return_target_is_same_origin() {
        let paths = RedirectPaths::default();
        let location = paths.location(
            RedirectTarget::AuthEntry { keep_return: true },
            "//evil.example/dashboard",
        );

        assert_eq!(
            extract_return_target(&location, "redirect_url").as_deref(),
            Some("/evil.example/dashboard")
        );
    }

    #[test]
    fn test_plain_targets() {
        let paths = RedirectPaths::default();
        assert_eq!(
            paths.location(RedirectTarget::AuthEntry { keep_return: false }, "/select-org"),
            "/sign-in"
        );
        assert_eq!(paths.location(RedirectTarget::TenantSelection, "/x"), "/select-org");
        assert_eq!(paths.location(RedirectTarget::Dashboard, "/sign-in"), "/dashboard");
    }

    #[test]
    fn test_custom_return_param() {
        let paths = RedirectPaths::from_config(&RedirectsConfig {
            return_param: "next".into(),
            ..RedirectsConfig::default()
        });
        let location = paths.location(RedirectTarget::AuthEntry { keep_return: true }, "/dashboard");

        assert_eq!(location, "/sign-in?next=%2Fdashboard");
        assert_eq!(extract_return_target(&location, "redirect_url"), None);
    }

    #[test]
    fn test_malformed_request_drops_return_target() {
        let paths = RedirectPaths::default();
        assert_eq!(
            paths.location(RedirectTarget::AuthEntry { keep_return: true }, "garbage"),
            "/sign-in"
        );
    }
}
