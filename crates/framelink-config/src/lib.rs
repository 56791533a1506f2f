//! framelink configuration.
//!
//! TOML-based configuration for the embed bridge: which client origin the
//! host frames, the options it starts the client with, and the embed-side
//! polling cadence. All sections use defaults so partial configs work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use framelink_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    EmbedConfig, EmbedOptions, FramelinkConfig, HostConfig, LogLevel, LoggingConfig,
    CONFIG_SCHEMA_VERSION,
};

use framelink_common::ConfigError;

/// Load config from the platform default path and validate it strictly.
pub fn load_config() -> Result<FramelinkConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &FramelinkConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = FramelinkConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"host\""));
        assert!(json.contains("\"options\""));
        assert!(json.contains("\"embed\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = FramelinkConfig::default();
        let json = config_to_json(&config);
        let parsed: FramelinkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.host.domain, "p2p.mirotalk.com");
        assert_eq!(parsed.host.options, config.host.options);
        assert_eq!(parsed.embed, config.embed);
    }
}
