//! Validation for embed-side polling intervals.

use crate::schema::FramelinkConfig;

use super::helpers::validate_range;

pub(crate) fn validate_timings(errors: &mut Vec<String>, config: &FramelinkConfig) {
    validate_range(
        errors,
        "embed.join_poll_ms",
        config.embed.join_poll_ms,
        10,
        60_000,
    );
    validate_range(
        errors,
        "embed.screen_poll_ms",
        config.embed.screen_poll_ms,
        10,
        60_000,
    );
    validate_range(
        errors,
        "embed.screen_hint_delay_ms",
        config.embed.screen_hint_delay_ms,
        0,
        5_000,
    );
}
