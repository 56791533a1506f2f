//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod embed;
mod helpers;
mod host;


use crate::schema::FramelinkConfig;
use framelink_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &FramelinkConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    host::validate_target(&mut errors, config);
    host::validate_options(&mut errors, config);
    embed::validate_timings(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

pub use host::{is_valid_css_size, is_valid_domain};
