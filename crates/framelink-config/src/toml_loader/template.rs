//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# framelink configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[host]
domain = "p2p.mirotalk.com"
# scheme = "https"       # https or http
# join_path = "/join"

[host.options]
room = "default-room"
# name = "guest"
# room_password = "secret"
# avatar = false
# audio = false
# video = false
# screen = false
# chat = false
# hide = false
# notify = false
# width = "100vw"
# height = "100vh"
# duration = "00:30:00"
# token = "..."          # omitted from the join URL when unset

[embed]
# join_poll_ms = 1000         # 10-60000
# screen_poll_ms = 1000       # 10-60000
# screen_hint_delay_ms = 50   # 0-5000

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
