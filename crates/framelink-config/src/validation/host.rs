//! Validation for the host target and frame options.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::FramelinkConfig;

use super::helpers::validate_non_empty;

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*(:[0-9]{1,5})?$",
    )
    .expect("validation: static regex pattern must compile")
});

static CSS_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|auto|[0-9]+(\.[0-9]+)?(px|%|vw|vh|vmin|vmax|em|rem))$")
        .expect("validation: static regex pattern must compile")
});

/// Whether `domain` is a bare host name with an optional port.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_RE.is_match(domain)
}

/// Whether `size` is a CSS length the frame style accepts.
pub fn is_valid_css_size(size: &str) -> bool {
    CSS_SIZE_RE.is_match(size.trim())
}

pub(crate) fn validate_target(errors: &mut Vec<String>, config: &FramelinkConfig) {
    let host = &config.host;
    validate_non_empty(errors, "host.domain", &host.domain);
    if !host.domain.trim().is_empty() && !is_valid_domain(&host.domain) {
        errors.push(format!(
            "host.domain = '{}' is not a host name with optional port",
            host.domain
        ));
    }
    if host.scheme != "https" && host.scheme != "http" {
        errors.push(format!(
            "host.scheme = '{}' must be 'https' or 'http'",
            host.scheme
        ));
    }
    if !host.join_path.starts_with('/') {
        errors.push(format!(
            "host.join_path = '{}' must start with '/'",
            host.join_path
        ));
    }
}

pub(crate) fn validate_options(errors: &mut Vec<String>, config: &FramelinkConfig) {
    let options = &config.host.options;
    validate_non_empty(errors, "host.options.room", &options.room);
    if !is_valid_css_size(&options.width) {
        errors.push(format!(
            "host.options.width = '{}' is not a CSS size",
            options.width
        ));
    }
    if !is_valid_css_size(&options.height) {
        errors.push(format!(
            "host.options.height = '{}' is not a CSS size",
            options.height
        ));
    }
    if let Some(token) = &options.token {
        validate_non_empty(errors, "host.options.token", token);
    }
}
