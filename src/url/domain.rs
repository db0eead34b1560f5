use url::Url;

/// Extracts the host of a URL, with its explicit port if one was given
///
/// The host is lowercased by URL parsing; a default port for the scheme is not
/// reported.
///
/// # Arguments
///
/// * `url` - The URL to extract the host from
///
/// # Returns
///
/// * `Some(String)` - `host` or `host:port`
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use deadlink::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(extract_host(&url), Some("localhost:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Derives the default report file name for a seed URL
///
/// The name is `broken_links_<host>.csv`, with `:` in the host replaced by `_`
/// so a port does not produce an awkward file name.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use deadlink::url::report_file_name;
///
/// let url = Url::parse("http://localhost:8080/docs").unwrap();
/// assert_eq!(report_file_name(&url), "broken_links_localhost_8080.csv");
/// ```
pub fn report_file_name(seed: &Url) -> String {
    let host = extract_host(seed).unwrap_or_default().replace(':', "_");
    format!("broken_links_{}.csv", host)
}
