use crate::config::types::{
    Config, CrawlerConfig, ExtractorConfig, FetcherConfig, OutputConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_extractor_config(&config.extractor)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates frontier configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_generation = 0 is legal: only the seeds are fetched

    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use the http or https scheme",
                seed
            )));
        }
    }

    for ext in &config.blocked_extensions {
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            return Err(ConfigError::Validation(format!(
                "blocked extension '{}' must be a bare extension such as 'png'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates fetcher timeouts
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs ({}) cannot exceed timeout_secs ({})",
            config.connect_timeout_secs, config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates extractor configuration
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.min_text_length == 0 {
        return Err(ConfigError::Validation(
            "min_text_length must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
