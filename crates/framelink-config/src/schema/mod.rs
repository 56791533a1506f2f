//! Configuration schema types for framelink.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults the embed client expects.

mod embed;
mod host;
mod system;

pub use embed::*;
pub use host::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FramelinkConfig {
    pub host: HostConfig,
    pub embed: EmbedConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
