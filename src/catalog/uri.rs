//! Resource URI addressing.
//!
//! A resource is named `<scheme>://<service>/<relative path>`. The URI is
//! never stored; it is generated from and parsed back into a
//! `(service, relative path)` pair on demand.
//!
//! Path segments are not percent-encoded. Service names come from a single
//! directory name and so never contain `/`, which keeps every generated URI
//! round-trippable, but characters such as `?`, `#` or spaces are passed
//! through as-is and may confuse generic URI parsers on the client side.

use super::error::UriError;

/// Default scheme name for resource URIs.
pub const DEFAULT_SCHEME: &str = "dealmate";

/// The `(service, relative path)` pair addressed by a resource URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePath<'a> {
    /// Service name (top-level directory).
    pub service: &'a str,
    /// Slash-separated path relative to the service root.
    pub relative_path: &'a str,
}

/// A fixed URI scheme used to build and parse resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriScheme {
    /// The scheme followed by `://`.
    prefix: String,
}

impl UriScheme {
    /// Creates a scheme from its bare name (e.g. `"dealmate"`).
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            prefix: format!("{name}://"),
        }
    }

    /// Returns the bare scheme name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.prefix.strip_suffix("://").unwrap_or(&self.prefix)
    }

    /// Builds the URI for a record.
    #[must_use]
    pub fn to_uri(&self, service: &str, relative_path: &str) -> String {
        format!("{}{service}/{relative_path}", self.prefix)
    }

    /// Parses a URI into its service and relative path.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::InvalidScheme`] if `uri` does not start with this
    /// scheme, and [`UriError::InvalidPath`] if the remainder does not split on
    /// its first `/` into a non-empty service and a non-empty path.
    pub fn parse<'u>(&self, uri: &'u str) -> Result<ResourcePath<'u>, UriError> {
        let rest = uri
            .strip_prefix(self.prefix.as_str())
            .ok_or(UriError::InvalidScheme)?;

        match rest.split_once('/') {
            Some((service, relative_path)) if !service.is_empty() && !relative_path.is_empty() => {
                Ok(ResourcePath {
                    service,
                    relative_path,
                })
            }
            _ => Err(UriError::InvalidPath),
        }
    }
}

impl Default for UriScheme {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEME)
    }
}

/// Returns `true` if `name` is a valid URI scheme name.
///
/// A scheme starts with an ASCII letter followed by letters, digits, `+`, `-` or `.`.
#[must_use]
pub fn is_valid_scheme_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
