//! HTTP fetcher implementation
//!
//! This module handles page requests for the crawler, including:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests to fetch page content
//! - Content-Type screening before the body is read
//! - Error classification into record-ready descriptions

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for both pages and probes
const MAX_REDIRECTS: usize = 10;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page loaded but is not HTML
    NotHtml {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Canonical reason phrase, if the code has one
        reason: Option<&'static str>,
    },

    /// Request failed before a status was received (DNS, connect, TLS, timeout)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// The PAGE LOAD ERROR cause, or `None` for pages that loaded
    pub fn failure_cause(&self) -> Option<String> {
        match self {
            Self::Success { .. } | Self::NotHtml { .. } => None,
            Self::HttpError {
                status_code,
                reason: Some(reason),
            } => Some(format!("HTTP {} {}", status_code, reason)),
            Self::HttpError {
                status_code,
                reason: None,
            } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed (up to 10 hops) for both page fetches and liveness
/// probes. Timeouts are applied per request by the callers.
///
/// # Example
///
/// ```no_run
/// use deadlink::config::UserAgentConfig;
/// use deadlink::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page with a GET request
///
/// # Request Flow
///
/// 1. Send GET with the given timeout, following redirects
/// 2. Any final status outside 2xx → `HttpError`
/// 3. A Content-Type that is present and not HTML → `NotHtml` (body not read)
/// 4. Otherwise read the body as text → `Success`
///
/// A single attempt is made; there are no retries.
pub async fn fetch_page(client: &Client, url: &Url, timeout: Duration) -> FetchResult {
    let response = match client.get(url.clone()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                error: describe_error(&e),
            }
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
            reason: status.canonical_reason(),
        };
    }

    let final_url = response.url().clone();

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return FetchResult::NotHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: describe_error(&e),
        },
    }
}

/// Returns true if a Content-Type may hold an HTML document
///
/// A missing header is treated as HTML, since many servers omit it.
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}

/// Describes a request error for a report row
///
/// Timeouts and connection failures get a short prefix; the full source chain
/// is appended so DNS and TLS causes are visible.
pub fn describe_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "Request timeout"
    } else if error.is_connect() {
        "Connection failed"
    } else if error.is_redirect() {
        "Redirect error"
    } else if error.is_builder() {
        "Invalid request"
    } else {
        "Request failed"
    };

    let mut message = format!("{}: {}", kind, error);
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
