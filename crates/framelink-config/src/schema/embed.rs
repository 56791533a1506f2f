//! Embed-side timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Polling cadence of the embedded bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Interval between connection-state checks until the room is joined
    /// (valid range: 10-60000).
    pub join_poll_ms: u32,
    /// Interval between screen-share state checks (valid range: 10-60000).
    pub screen_poll_ms: u32,
    /// Delay between a share button click and the follow-up state check
    /// (valid range: 0-5000).
    pub screen_hint_delay_ms: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            join_poll_ms: 1000,
            screen_poll_ms: 1000,
            screen_hint_delay_ms: 50,
        }
    }
}

impl EmbedConfig {
    pub fn join_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.join_poll_ms))
    }

    pub fn screen_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.screen_poll_ms))
    }

    pub fn screen_hint_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.screen_hint_delay_ms))
    }
}
