use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use passwatch::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Scraping satellite {}", config.target.sat_id);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
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

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[target]
sat-id = 25544
name = "ISS"

[observer]
latitude = 39.9042
longitude = 116.4074
place-name = "北京市"
altitude = 52
timezone = "ChST"

[scrape]
pages = 4

[output]
data-root = "./public/data"

[session]
cookie = "underConstruction=czo9"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.target.sat_id, 25544);
        assert_eq!(config.observer.place_name, "北京市");
        assert_eq!(config.scrape.pages, 4);
        assert_eq!(config.session.cookie, "underConstruction=czo9");
    }

    #[test]
    fn test_scrape_defaults_applied() {
        let config_content = r#"
[target]
sat-id = 25544

[observer]
latitude = 39.9042
longitude = 116.4074
place-name = "Beijing"
timezone = "ChST"

[output]
data-root = "./data"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.scrape.pages, 4);
        assert_eq!(config.scrape.max_concurrent_fetches, 4);
        assert_eq!(config.scrape.retry_attempts, 3);
        assert!(config.scrape.endpoint.contains("heavens-above.com"));
        assert!(config.session.cookie.is_empty());
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
        let config_content = r#"
[target]
sat-id = 0

[observer]
latitude = 39.9042
longitude = 116.4074
place-name = "Beijing"
timezone = "ChST"

[output]
data-root = "./data"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
