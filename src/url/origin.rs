use crate::url::normalize::{strip_fragment, NormalizedUrl};
use crate::url::LinkOrigin;
use crate::{UrlError, UrlResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How a link is judged to share the seed's origin
///
/// The default is a literal string-prefix test. It over-matches
/// (`https://example.com.evil.com` is internal for a seed of
/// `https://example.com`) and under-matches (`http://` and `https://` are
/// different origins). `Authority` compares parsed scheme, host and port instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginPolicy {
    /// URL starts with the seed's scheme and authority, exactly as supplied
    #[default]
    Prefix,
    /// URL starts with the whole seed URL (fragment removed)
    SeedPrefix,
    /// Parsed scheme, host and effective port all equal the seed's
    Authority,
}

impl FromStr for OriginPolicy {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "seed-prefix" => Ok(Self::SeedPrefix),
            "authority" => Ok(Self::Authority),
            other => Err(UrlError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for OriginPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix => write!(f, "prefix"),
            Self::SeedPrefix => write!(f, "seed-prefix"),
            Self::Authority => write!(f, "authority"),
        }
    }
}

/// Returns the scheme and authority of a raw seed string, as supplied
///
/// No case folding or default-port handling is done.
///
/// # Examples
///
/// ```
/// use deadlink::url::seed_origin;
///
/// assert_eq!(seed_origin("https://example.com/docs/"), "https://example.com");
/// assert_eq!(seed_origin("http://Example.com:8080?q=1"), "http://Example.com:8080");
/// assert_eq!(seed_origin("https://example.com"), "https://example.com");
/// ```
pub fn seed_origin(seed: &str) -> &str {
    let seed = seed.trim();
    let Some(scheme_end) = seed.find("://") else {
        return seed;
    };
    let authority_start = scheme_end + 3;
    let authority_len = seed[authority_start..]
        .find(['/', '?', '#'])
        .unwrap_or(seed.len() - authority_start);
    &seed[..authority_start + authority_len]
}

/// Classifies a URL by literal prefix comparison with the seed origin
///
/// # Examples
///
/// ```
/// use deadlink::url::{classify, strip_fragment, LinkOrigin};
///
/// let origin = "https://example.com";
/// assert_eq!(classify(origin, &strip_fragment("https://example.com/a")), LinkOrigin::Internal);
/// assert_eq!(classify(origin, &strip_fragment("https://other.org/")), LinkOrigin::External);
/// ```
pub fn classify(seed_origin: &str, url: &NormalizedUrl) -> LinkOrigin {
    if url.as_str().starts_with(seed_origin) {
        LinkOrigin::Internal
    } else {
        LinkOrigin::External
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Authority {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Authority {
    fn of(url: &Url) -> Option<Self> {
        Some(Self {
            scheme: url.scheme().to_string(),
            host: url.host_str()?.to_string(),
            port: url.port_or_known_default(),
        })
    }
}

/// The crawl scope: the seed origin together with the policy that applies it
#[derive(Debug, Clone)]
pub struct Scope {
    policy: OriginPolicy,
    prefix: String,
    authority: Authority,
}

impl Scope {
    /// Builds the scope for a seed URL under the given policy
    ///
    /// # Returns
    ///
    /// * `Ok(Scope)` - The seed parsed and has a host
    /// * `Err(UrlError)` - The seed is not an absolute URL with a host
    pub fn new(seed: &str, policy: OriginPolicy) -> UrlResult<Self> {
        let parsed = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        let authority = Authority::of(&parsed).ok_or(UrlError::MissingHost)?;

        let prefix = match policy {
            OriginPolicy::Prefix | OriginPolicy::Authority => seed_origin(seed).to_string(),
            OriginPolicy::SeedPrefix => strip_fragment(seed.trim()).into_string(),
        };

        Ok(Self {
            policy,
            prefix,
            authority,
        })
    }

    /// The policy in force
    pub fn policy(&self) -> OriginPolicy {
        self.policy
    }

    /// The literal prefix used by the prefix policies
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classifies a URL string as internal or external
    pub fn classify(&self, url: &NormalizedUrl) -> LinkOrigin {
        match self.policy {
            OriginPolicy::Prefix | OriginPolicy::SeedPrefix => classify(&self.prefix, url),
            OriginPolicy::Authority => {
                let same = Url::parse(url.as_str())
                    .ok()
                    .as_ref()
                    .and_then(Authority::of)
                    .is_some_and(|theirs| theirs == self.authority);
                if same {
                    LinkOrigin::Internal
                } else {
                    LinkOrigin::External
                }
            }
        }
    }
}
