use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiSettings, AuthSettings, Config, PollingSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the configuration file,
/// deserializes it into our strongly-typed `Config` struct, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Optionally, one could add environment variables here as well.
        // .add_source(config::Environment::with_prefix("APP"));
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    validate(&config)?;

    Ok(config)
}

/// Rejects configurations the client cannot operate with.
fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url must not be empty".to_string(),
        ));
    }
    if config.api.base_url.ends_with('/') {
        return Err(ConfigError::ValidationError(
            "api.base_url must not end with a trailing slash".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Config>()?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = parse(
            r#"
            [api]
            base_url = "http://localhost:8080/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.polling.backtest_interval_secs, 2);
        assert_eq!(config.polling.price_interval_secs, 5);
        assert_eq!(
            config.auth.token_file.to_str().unwrap(),
            ".quantdesk/tokens.json"
        );
    }

    #[test]
    fn trailing_slash_is_rejected() {
        let err = parse(
            r#"
            [api]
            base_url = "http://localhost:8080/api/"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_api_section_is_a_load_error() {
        assert!(parse("[polling]\nprice_interval_secs = 1").is_err());
    }
}
