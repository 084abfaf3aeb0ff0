use crate::config::types::{Config, ObserverConfig, OutputConfig, ScrapeConfig, TargetConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the number of pages a single run may request
pub const MAX_PAGES: u32 = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target(&config.target)?;
    validate_observer(&config.observer)?;
    validate_scrape(&config.scrape)?;
    validate_output(&config.output)?;
    Ok(())
}

/// Validates the scrape target
fn validate_target(target: &TargetConfig) -> Result<(), ConfigError> {
    if target.sat_id == 0 {
        return Err(ConfigError::Validation(
            "sat-id must be a positive catalog number".to_string(),
        ));
    }

    Ok(())
}

/// Validates the observer location
fn validate_observer(observer: &ObserverConfig) -> Result<(), ConfigError> {
    if !(-90.0..=90.0).contains(&observer.latitude) {
        return Err(ConfigError::Validation(format!(
            "latitude must be between -90 and 90, got {}",
            observer.latitude
        )));
    }

    if !(-180.0..=180.0).contains(&observer.longitude) {
        return Err(ConfigError::Validation(format!(
            "longitude must be between -180 and 180, got {}",
            observer.longitude
        )));
    }

    if observer.place_name.is_empty() {
        return Err(ConfigError::Validation(
            "place-name cannot be empty".to_string(),
        ));
    }

    if observer.timezone.is_empty() {
        return Err(ConfigError::Validation(
            "timezone cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates scrape behavior settings
fn validate_scrape(scrape: &ScrapeConfig) -> Result<(), ConfigError> {
    if scrape.pages < 1 || scrape.pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "pages must be between 1 and {}, got {}",
            MAX_PAGES, scrape.pages
        )));
    }

    if scrape.max_concurrent_fetches < 1 || scrape.max_concurrent_fetches > 16 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-fetches must be between 1 and 16, got {}",
            scrape.max_concurrent_fetches
        )));
    }

    if scrape.retry_attempts < 1 {
        return Err(ConfigError::Validation(
            "retry-attempts must be >= 1".to_string(),
        ));
    }

    if scrape.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if scrape.run_timeout_secs < scrape.fetch_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "run-timeout-secs ({}) must be >= fetch-timeout-secs ({})",
            scrape.run_timeout_secs, scrape.fetch_timeout_secs
        )));
    }

    let endpoint = Url::parse(&scrape.endpoint)
        .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", scrape.endpoint, e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidEndpoint(format!(
            "endpoint must use http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    Ok(())
}

/// Validates output settings
fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
    if output.data_root.is_empty() {
        return Err(ConfigError::Validation(
            "data-root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SessionConfig;

    fn valid_config() -> Config {
        Config {
            target: TargetConfig {
                sat_id: 25544,
                name: "ISS".to_string(),
            },
            observer: ObserverConfig {
                latitude: 39.9042,
                longitude: 116.4074,
                place_name: "北京市".to_string(),
                altitude: 52,
                timezone: "ChST".to_string(),
            },
            scrape: ScrapeConfig::default(),
            output: OutputConfig {
                data_root: "./data".to_string(),
            },
            session: SessionConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_zero_sat_id_rejected() {
        let mut config = valid_config();
        config.target.sat_id = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_latitude_out_of_range() {
        let mut config = valid_config();
        config.observer.latitude = 91.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_longitude_out_of_range() {
        let mut config = valid_config();
        config.observer.longitude = -180.5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_place_name_rejected() {
        let mut config = valid_config();
        config.observer.place_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_pages_rejected() {
        let mut config = valid_config();
        config.scrape.pages = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excessive_pages_rejected() {
        let mut config = valid_config();
        config.scrape.pages = MAX_PAGES + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = valid_config();
        config.scrape.endpoint = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_ftp_endpoint_rejected() {
        let mut config = valid_config();
        config.scrape.endpoint = "ftp://example.com/data".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_run_timeout_shorter_than_fetch_timeout_rejected() {
        let mut config = valid_config();
        config.scrape.run_timeout_secs = 5;
        config.scrape.fetch_timeout_secs = 30;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_data_root_rejected() {
        let mut config = valid_config();
        config.output.data_root = String::new();
        assert!(validate(&config).is_err());
    }
}
