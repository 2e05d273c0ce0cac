//! Request path normalization.
//!
//! # Responsibilities
//! - Strip query string and fragment
//! - Decode percent-escapes of unreserved characters
//! - Collapse repeated slashes and drop trailing slashes
//! - Resolve `.` and `..` segments lexically
//! - Reject paths that cannot be classified safely
//!
//! # Design Decisions
//! - `..` is resolved, not rejected: `/a/../dashboard` must classify as
//!   `/dashboard`, otherwise a traversal would be waved through as public
//! - `..` above the root clamps to the root (same as URL parsers)
//! - Unreserved escapes (`%64`, `%2e`) are decoded before segmenting, so
//!   `/%64ashboard` and `/blog/%2e%2e/dashboard` both land on `/dashboard`
//! - `\`, `%2F` and `%5C` separate segments, like a decoding downstream would
//! - Other escapes stay encoded with upper-case hex; a `%` that does not start
//!   a valid escape is kept as `%25`, so one bad escape never turns a
//!   protected prefix into a public path

use thiserror::Error;

/// Reasons a raw path cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path must start with '/': {0:?}")]
    NotAbsolute(String),

    #[error("path contains control characters")]
    ControlCharacter,
}

/// A request path in canonical form.
///
/// Always starts with `/`, never contains empty segments, never ends with `/`
/// unless it is the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalize a raw request target (path, optionally followed by `?query` or `#fragment`).
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let end = raw.find(|c: char| c == '?' || c == '#').unwrap_or(raw.len());
        let path = &raw[..end];

        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if !path.starts_with('/') {
            return Err(PathError::NotAbsolute(path.to_string()));
        }
        if path.chars().any(char::is_control) {
            return Err(PathError::ControlCharacter);
        }

        let decoded = decode_unreserved(path);
        let mut segments: Vec<&str> = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Ok(Self("/".to_string()));
        }

        let mut out = String::with_capacity(path.len());
        for segment in segments {
            out.push('/');
            out.push_str(segment);
        }
        Ok(Self(out))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the non-empty segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

/// Decode `%XX` escapes of unreserved characters and turn encoded or literal
/// backslashes and encoded slashes into `/`.
fn decode_unreserved(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '%' => match escaped_byte(rest) {
                Some(byte) => {
                    rest = &rest[2..];
                    match byte {
                        b'/' | b'\\' => out.push('/'),
                        b if is_unreserved(b) => out.push(char::from(b)),
                        b => out.push_str(&format!("%{b:02X}")),
                    }
                }
                None => out.push_str("%25"),
            },
            '\\' => out.push('/'),
            c => out.push(c),
        }
    }
    out
}

fn escaped_byte(rest: &str) -> Option<u8> {
    let hex = rest.get(..2)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: &str) -> String {
        NormalizedPath::parse(raw).unwrap().as_str().to_string()
    }

    #[test]
    fn test_strips_query_fragment_and_trailing_slash() {
        assert_eq!(norm("/dashboard/"), "/dashboard");
        assert_eq!(norm("/dashboard/bookings?page=2"), "/dashboard/bookings");
        assert_eq!(norm("/blog#top"), "/blog");
        assert_eq!(norm("/sign-in/?redirect_url=%2F"), "/sign-in");
    }

    #[test]
    fn test_collapses_slashes_and_dot_segments() {
        assert_eq!(norm("//dashboard///bookings"), "/dashboard/bookings");
        assert_eq!(norm("/./dashboard/."), "/dashboard");
        assert_eq!(norm("/blog/../dashboard"), "/dashboard");
        assert_eq!(norm("/../../dashboard"), "/dashboard");
    }

    #[test]
    fn test_root() {
        let root = NormalizedPath::parse("/").unwrap();
        assert!(root.is_root());
        assert_eq!(root.segments().count(), 0);
        assert_eq!(norm("/?x=1"), "/");
        assert_eq!(norm("/.."), "/");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(NormalizedPath::parse(""), Err(PathError::Empty));
        assert_eq!(NormalizedPath::parse("?q=1"), Err(PathError::Empty));
        assert!(matches!(
            NormalizedPath::parse("dashboard"),
            Err(PathError::NotAbsolute(_))
        ));
        assert_eq!(
            NormalizedPath::parse("/dash\nboard"),
            Err(PathError::ControlCharacter)
        );
    }

    #[test]
    fn test_decodes_unreserved_escapes() {
        assert_eq!(norm("/%64ashboard/bookings"), "/dashboard/bookings");
        assert_eq!(norm("/%44ashboard"), "/Dashboard");
        assert_eq!(norm("/blog/%2e%2e/dashboard"), "/dashboard");
        assert_eq!(norm("/blog/.%2E/dashboard"), "/dashboard");
        assert_eq!(norm("/%2e%2e/dashboard"), "/dashboard");
        assert_eq!(norm("/sign%2Din"), "/sign-in");
    }

    #[test]
    fn test_encoded_and_back_slashes_separate_segments() {
        assert_eq!(norm("/dashboard%2Fbookings"), "/dashboard/bookings");
        assert_eq!(norm("/dashboard%2fbookings"), "/dashboard/bookings");
        assert_eq!(norm("/blog%5C..%5Cdashboard"), "/dashboard");
        assert_eq!(norm("/\\evil.example"), "/evil.example");
    }

    #[test]
    fn test_reserved_escapes_stay_encoded() {
        assert_eq!(norm("/files/a%20b"), "/files/a%20b");
        assert_eq!(norm("/caf%c3%a9"), "/caf%C3%A9");
        assert_eq!(norm("/a%3Fb"), "/a%3Fb");
        // Decoding happens once; a double-encoded dot stays a literal escape.
        assert_eq!(norm("/blog/%252e%252e/dashboard"), "/blog/%252e%252e/dashboard");
    }

    #[test]
    fn test_invalid_escape_is_kept_literal() {
        assert_eq!(norm("/dashboard/%zz"), "/dashboard/%25zz");
        assert_eq!(norm("/dashboard/100%"), "/dashboard/100%25");
        assert_eq!(norm("/dashboard/%4"), "/dashboard/%254");
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(norm("/Dashboard"), "/Dashboard");
    }
}
