//! Host-side configuration: where the embedded client lives and the
//! options it is started with.

use serde::{Deserialize, Serialize};

/// Location of the embedded conferencing client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Host (and optional port) serving the client, e.g. `p2p.mirotalk.com`.
    pub domain: String,
    /// `https` or `http`.
    pub scheme: String,
    /// Path of the join page on the client origin.
    pub join_path: String,
    pub options: EmbedOptions,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            domain: "p2p.mirotalk.com".into(),
            scheme: "https".into(),
            join_path: "/join".into(),
            options: EmbedOptions::default(),
        }
    }
}

/// Options serialized into the frame's join URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedOptions {
    pub room: String,
    pub name: String,
    pub room_password: Option<String>,
    pub avatar: bool,
    pub audio: bool,
    pub video: bool,
    pub screen: bool,
    pub chat: bool,
    pub hide: bool,
    pub notify: bool,
    /// CSS width of the frame.
    pub width: String,
    /// CSS height of the frame.
    pub height: String,
    /// Session duration, e.g. `00:30:00` or `unlimited`.
    pub duration: Option<String>,
    /// Auth token. Omitted from the URL entirely when unset.
    pub token: Option<String>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            room: "default-room".into(),
            name: "guest".into(),
            room_password: None,
            avatar: false,
            audio: false,
            video: false,
            screen: false,
            chat: false,
            hide: false,
            notify: false,
            width: "100vw".into(),
            height: "100vh".into(),
            duration: None,
            token: None,
        }
    }
}

impl EmbedOptions {
    /// Options for a named room with everything else defaulted.
    pub fn for_room(room: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            ..Default::default()
        }
    }
}
