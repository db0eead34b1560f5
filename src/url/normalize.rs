use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// A URL string with its fragment removed
///
/// This is the unit of identity for deduplication and depth tracking: two URLs
/// that differ only by fragment are the same `NormalizedUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    /// Returns the URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the normalized string back into a `Url`
    pub fn to_url(&self) -> UrlResult<Url> {
        Url::parse(&self.0).map_err(|e| UrlError::Parse(e.to_string()))
    }

    /// Consumes the wrapper and returns the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&Url> for NormalizedUrl {
    fn from(url: &Url) -> Self {
        strip_fragment(url.as_str())
    }
}

/// Removes any `#...` suffix from a URL string
///
/// Stripping is idempotent: `strip_fragment(strip_fragment(u)) == strip_fragment(u)`.
///
/// # Examples
///
/// ```
/// use deadlink::url::strip_fragment;
///
/// let url = strip_fragment("https://example.com/page#section");
/// assert_eq!(url.as_str(), "https://example.com/page");
///
/// let again = strip_fragment(url.as_str());
/// assert_eq!(again, url);
/// ```
pub fn strip_fragment(url: &str) -> NormalizedUrl {
    let without = match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    };
    NormalizedUrl(without.to_string())
}

/// Resolves a possibly-relative reference against a base URL
///
/// Standard URL resolution rules apply: scheme, authority, path and query are
/// inherited from `base` as the reference requires. Surrounding whitespace in
/// `href` is ignored, as browsers do.
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL (fragment preserved)
/// * `Err(UrlError)` - The reference cannot be resolved at all
///
/// # Examples
///
/// ```
/// use deadlink::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(resolve(&base, "setup").unwrap().as_str(), "https://example.com/docs/setup");
/// assert_eq!(resolve(&base, "/about").unwrap().as_str(), "https://example.com/about");
/// assert_eq!(resolve(&base, "?page=2").unwrap().as_str(), "https://example.com/docs/intro?page=2");
/// ```
pub fn resolve(base: &Url, href: &str) -> UrlResult<Url> {
    base.join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href.trim(), e)))
}
