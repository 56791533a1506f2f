//! Join URL construction for the embedded frame.

use framelink_config::{EmbedOptions, HostConfig};

/// Permissions the conferencing client needs inside the frame.
pub const FRAME_ALLOW: &str =
    "camera; microphone; display-capture; fullscreen; clipboard-read; clipboard-write; web-share; autoplay";

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Ordered query parameters for the join page.
///
/// Booleans serialize as `1`/`0`. Optional values that are unset are left
/// out entirely rather than serialized empty.
pub fn query_pairs(options: &EmbedOptions) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("room", options.room.clone())];
    if let Some(password) = &options.room_password {
        pairs.push(("roomPassword", password.clone()));
    }
    pairs.push(("name", options.name.clone()));
    for (key, value) in [
        ("avatar", options.avatar),
        ("audio", options.audio),
        ("video", options.video),
        ("screen", options.screen),
        ("chat", options.chat),
        ("hide", options.hide),
        ("notify", options.notify),
    ] {
        pairs.push((key, flag(value).to_string()));
    }
    if let Some(duration) = &options.duration {
        pairs.push(("duration", duration.clone()));
    }
    if let Some(token) = options.token.as_deref().filter(|t| !t.is_empty()) {
        pairs.push(("token", token.to_string()));
    }
    pairs
}

/// Percent-encoded query string, without the leading `?`.
pub fn query_string(options: &EmbedOptions) -> String {
    query_pairs(options)
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Host part of the configured domain as a browser reports it: trimmed,
/// without a trailing slash, lowercase.
pub fn normalized_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('/').to_ascii_lowercase()
}

/// Origin the embedded client runs on, e.g. `https://p2p.mirotalk.com`.
pub fn child_origin(config: &HostConfig) -> String {
    format!(
        "{}://{}",
        config.scheme.trim().to_ascii_lowercase(),
        normalized_domain(&config.domain)
    )
}

/// Full frame URL: `<origin><join_path>?<query>`.
pub fn frame_url(config: &HostConfig) -> String {
    format!(
        "{}{}?{}",
        child_origin(config),
        config.join_path,
        query_string(&config.options)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(options: EmbedOptions) -> HostConfig {
        HostConfig {
            domain: "meet.example.org".into(),
            options,
            ..Default::default()
        }
    }

    #[test]
    fn default_options_query() {
        assert_eq!(
            query_string(&EmbedOptions::default()),
            "room=default-room&name=guest&avatar=0&audio=0&video=0&screen=0&chat=0&hide=0&notify=0"
        );
    }

    #[test]
    fn flags_serialize_as_one_and_zero() {
        let options = EmbedOptions {
            audio: true,
            chat: true,
            notify: true,
            ..Default::default()
        };
        let pairs = query_pairs(&options);
        let get = |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());
        assert_eq!(get("audio"), Some("1"));
        assert_eq!(get("video"), Some("0"));
        assert_eq!(get("chat"), Some("1"));
        assert_eq!(get("notify"), Some("1"));
    }

    #[test]
    fn absent_token_is_omitted() {
        let query = query_string(&EmbedOptions::default());
        assert!(!query.contains("token"));

        let options = EmbedOptions {
            token: Some(String::new()),
            ..Default::default()
        };
        assert!(!query_string(&options).contains("token"));
    }

    #[test]
    fn optional_values_included_when_set() {
        let options = EmbedOptions {
            room_password: Some("hunter2".into()),
            duration: Some("00:30:00".into()),
            token: Some("jwt.abc".into()),
            ..Default::default()
        };
        let query = query_string(&options);
        assert!(query.contains("roomPassword=hunter2"));
        assert!(query.contains("duration=00%3A30%3A00"));
        assert!(query.ends_with("token=jwt.abc"));
    }

    #[test]
    fn values_are_percent_encoded() {
        let options = EmbedOptions {
            room: "team sync&more".into(),
            name: "Zoë".into(),
            ..Default::default()
        };
        let query = query_string(&options);
        assert!(query.starts_with("room=team%20sync%26more&"));
        assert!(query.contains("name=Zo%C3%AB"));
    }

    #[test]
    fn url_and_origin() {
        let config = config_for(EmbedOptions::for_room("standup"));
        assert_eq!(child_origin(&config), "https://meet.example.org");
        assert!(frame_url(&config).starts_with("https://meet.example.org/join?room=standup&"));
    }

    #[test]
    fn origin_is_normalized_like_the_browser() {
        let config = HostConfig {
            domain: " Meet.Example.ORG/ ".into(),
            scheme: "HTTPS".into(),
            ..Default::default()
        };
        assert_eq!(child_origin(&config), "https://meet.example.org");
        assert!(frame_url(&config).starts_with("https://meet.example.org/join?"));
    }

    #[test]
    fn http_scheme_and_port() {
        let config = HostConfig {
            domain: "localhost:3010".into(),
            scheme: "http".into(),
            ..Default::default()
        };
        assert_eq!(child_origin(&config), "http://localhost:3010");
    }
}
