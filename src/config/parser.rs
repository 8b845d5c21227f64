//! Loading of the crawler's TOML configuration
//!
//! A huffcrawl config names the seeds and the `max-generation` bound, the
//! fetcher timeouts, the extractor threshold, the user agent and the SQLite
//! file. Every loader here validates before returning, so a `Config` that
//! comes out of this module is ready for `crawl`.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates the config file at `path`
///
/// ```no_run
/// use std::path::Path;
/// use huffcrawl::config::load_config;
///
/// let config = load_config(Path::new("huffcrawl.toml")).unwrap();
/// println!("{} seeds, max generation {}", config.crawler.seeds.len(), config.crawler.max_generation);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Parses and validates config text
///
/// Missing `[fetcher]` and `[extractor]` tables take their defaults; a
/// missing `max-generation` is a parse error.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of the config file at `path`, as stored on each run row
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(hash_content(&std::fs::read_to_string(path)?))
}

/// Loads the config and hashes the exact text that was parsed
///
/// The file is read once, so the hash recorded for a run always matches the
/// configuration the run used.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[crawler]
max-generation = 2
seeds = ["https://example.com/", "http://example.org/start"]

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./test.db"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_generation, 2);
        assert_eq!(config.crawler.seeds.len(), 2);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_optional_sections_use_defaults() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetcher.timeout_secs, 10);
        assert_eq!(config.fetcher.connect_timeout_secs, 5);
        assert_eq!(config.extractor.min_text_length, 1);
        assert!(config
            .crawler
            .blocked_extensions
            .contains(&"png".to_string()));
    }

    #[test]
    fn test_blocked_extensions_override() {
        let config_content = VALID_CONFIG.replace(
            "seeds = [",
            "blocked-extensions = [\"pdf\"]\nseeds = [",
        );
        let file = create_temp_config(&config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.blocked_extensions, vec!["pdf".to_string()]);
        let filter = config.crawler.admission_filter();
        assert!(!filter.allows("https://example.com/a.pdf"));
        assert!(filter.allows("https://example.com/a.png"));
    }

    #[test]
    fn test_max_generation_is_required() {
        let config_content = VALID_CONFIG.replace("max-generation = 2\n", "");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_config_from_text() {
        let config = parse_config(VALID_CONFIG).unwrap();
        assert_eq!(config.crawler.max_generation, 2);

        let no_seeds = VALID_CONFIG.replace(
            r#"seeds = ["https://example.com/", "http://example.org/start"]"#,
            "seeds = []",
        );
        assert!(matches!(
            parse_config(&no_seeds),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = VALID_CONFIG.replace(
            r#"seeds = ["https://example.com/", "http://example.org/start"]"#,
            "seeds = []",
        );
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config(VALID_CONFIG);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.crawler.max_generation, 2);
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
