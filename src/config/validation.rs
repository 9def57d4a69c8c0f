use crate::config::types::{
    Config, DetailConfig, HttpConfig, ListingConfig, OutputConfig, SiteConfig, MAX_DELAY_SECS,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_listing_config(&config.listing)?;
    validate_detail_config(&config.detail)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target directory settings
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    validate_category(&config.category)
}

/// Rejects a blank root category label
///
/// Applies to the configured category and to any command-line override.
pub fn validate_category(category: &str) -> Result<(), ConfigError> {
    if category.trim().is_empty() {
        return Err(ConfigError::Validation(
            "category cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the listing fetch policy
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    validate_policy(
        "listing",
        config.max_attempts,
        config.backoff_delay,
        config.min_delay,
        config.max_delay,
    )?;

    if config.empty_streak_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "listing.empty-streak-threshold must be >= 1, got {}",
            config.empty_streak_threshold
        )));
    }

    Ok(())
}

/// Validates the detail fetch policy
fn validate_detail_config(config: &DetailConfig) -> Result<(), ConfigError> {
    validate_policy(
        "detail",
        config.max_attempts,
        config.backoff_delay,
        config.min_delay,
        config.max_delay,
    )
}

fn validate_policy(
    section: &str,
    max_attempts: u32,
    backoff_delay: f64,
    min_delay: f64,
    max_delay: f64,
) -> Result<(), ConfigError> {
    if max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "{}.max-attempts must be >= 1, got {}",
            section, max_attempts
        )));
    }

    for (key, value) in [
        ("backoff-delay", backoff_delay),
        ("min-delay", min_delay),
        ("max-delay", max_delay),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{}.{} must be a non-negative number of seconds, got {}",
                section, key, value
            )));
        }

        if value > MAX_DELAY_SECS {
            return Err(ConfigError::Validation(format!(
                "{}.{} must be at most {} seconds, got {}",
                section, key, MAX_DELAY_SECS, value
            )));
        }
    }

    if min_delay > max_delay {
        return Err(ConfigError::Validation(format!(
            "{}.min-delay ({}) cannot exceed {}.max-delay ({})",
            section, min_delay, section, max_delay
        )));
    }

    Ok(())
}

/// Validates output settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.filename_pattern.trim().is_empty() {
        return Err(ConfigError::Validation(
            "filename-pattern cannot be empty".to_string(),
        ));
    }

    Ok(())
}
