use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound for concurrent liveness probes on one page
const MAX_CONCURRENT_CHECKS: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates a seed URL and returns it parsed
///
/// The seed must be an absolute `http` or `https` URL with a host. Anything
/// else is an input error and aborts the run before crawling starts.
///
/// # Examples
///
/// ```
/// use deadlink::config::validate_seed;
///
/// assert!(validate_seed("https://example.com").is_ok());
/// assert!(validate_seed("ftp://example.com").is_err());
/// ```
pub fn validate_seed(seed: &str) -> ConfigResult<Url> {
    let invalid = |reason: String| ConfigError::InvalidSeed {
        url: seed.to_string(),
        reason,
    };

    let url = Url::parse(seed.trim()).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!(
            "only http and https URLs are supported, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if !config.delay_secs.is_finite() || config.delay_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay_secs
        )));
    }

    validate_timeout("timeout", config.timeout_secs)?;
    if let Some(page_timeout) = config.page_timeout_secs {
        validate_timeout("page-timeout", page_timeout)?;
    }

    if config.max_concurrent_checks < 1 || config.max_concurrent_checks > MAX_CONCURRENT_CHECKS {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-checks must be between 1 and {}, got {}",
            MAX_CONCURRENT_CHECKS, config.max_concurrent_checks
        )));
    }

    Ok(())
}

fn validate_timeout(name: &str, secs: f64) -> ConfigResult<()> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive number of seconds, got {}",
            name, secs
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens/underscores only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if let Some(path) = &config.csv_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "csv-path cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}
