//! Link liveness checker
//!
//! A link is probed with a single HEAD request, following redirects. The
//! final status decides the outcome: anything at or above 400 is broken, as
//! is any request that fails before a status arrives. There are no retries.

use crate::crawler::fetcher::describe_error;
use crate::state::CrawlCounters;
use crate::url::resolve;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Why a link is considered broken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokenReason {
    /// The probe got an HTTP status of 400 or above
    HttpStatus(u16),

    /// The probe failed at the transport level (DNS, connect, TLS, timeout)
    /// or the link could not be turned into a URL
    Transport(String),
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "{}", code),
            Self::Transport(message) => write!(f, "{}", message),
        }
    }
}

/// Result of one liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link answered with a status below 400
    Ok { status: u16 },

    /// The link is broken
    Broken(BrokenReason),
}

impl LinkOutcome {
    /// Returns true if the link is working
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The broken reason, if any
    pub fn broken_reason(&self) -> Option<&BrokenReason> {
        match self {
            Self::Ok { .. } => None,
            Self::Broken(reason) => Some(reason),
        }
    }

    fn from_status(status: u16) -> Self {
        if status >= 400 {
            Self::Broken(BrokenReason::HttpStatus(status))
        } else {
            Self::Ok { status }
        }
    }
}

/// Probes links and records each outcome in the shared counters
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    timeout: Duration,
    counters: Arc<CrawlCounters>,
}

impl LinkChecker {
    /// Creates a checker
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client (redirects enabled)
    /// * `timeout` - Per-probe timeout
    /// * `counters` - Counters updated once per completed probe
    pub fn new(client: Client, timeout: Duration, counters: Arc<CrawlCounters>) -> Self {
        Self {
            client,
            timeout,
            counters,
        }
    }

    /// Resolves `href` against `base` and probes the result
    ///
    /// Returns the resolved URL as text along with the outcome. An href that
    /// cannot be resolved is returned as given and reported broken without a
    /// request. Counters are updated exactly once, when the probe completes;
    /// a probe future dropped before completion counts nothing.
    pub async fn check(&self, base: &Url, href: &str) -> (String, LinkOutcome) {
        let (resolved, outcome) = match resolve(base, href) {
            Ok(url) => {
                let outcome = self.probe(&url).await;
                (url.to_string(), outcome)
            }
            Err(e) => (
                href.trim().to_string(),
                LinkOutcome::Broken(BrokenReason::Transport(format!("invalid URL: {}", e))),
            ),
        };

        self.counters.record_outcome(&outcome);
        (resolved, outcome)
    }

    async fn probe(&self, url: &Url) -> LinkOutcome {
        tracing::trace!("HEAD {}", url);

        match self
            .client
            .head(url.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => LinkOutcome::from_status(response.status().as_u16()),
            Err(e) => LinkOutcome::Broken(BrokenReason::Transport(describe_error(&e))),
        }
    }
}
