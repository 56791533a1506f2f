use tracing::{debug, trace};

use crate::commands::Command;
use crate::platform::Document;

use super::ids;
use super::EmbedInner;

impl EmbedInner {
    /// Map a host command onto the local UI.
    pub(super) fn dispatch(&self, name: &str) {
        let Some(command) = Command::parse(name) else {
            trace!(instance = %self.instance, command = name, "ignoring unknown command");
            return;
        };
        debug!(instance = %self.instance, %command, "command from host");

        let document = self.env.document.as_ref();
        let room = &self.env.room;
        match command {
            Command::AudioToggle => {
                click_if_enabled(document, ids::AUDIO_BUTTON);
            }
            Command::VideoToggle => {
                click_if_enabled(document, ids::VIDEO_BUTTON);
            }
            Command::ScreenToggle => {
                click_if_enabled(document, ids::SCREEN_SHARE_BUTTON);
            }
            Command::AudioOn => {
                set_toggle(document, ids::AUDIO_BUTTON, room.audio_enabled(), true);
            }
            Command::AudioOff => {
                set_toggle(document, ids::AUDIO_BUTTON, room.audio_enabled(), false);
            }
            Command::VideoOn => {
                set_toggle(document, ids::VIDEO_BUTTON, room.video_enabled(), true);
            }
            Command::VideoOff => {
                set_toggle(document, ids::VIDEO_BUTTON, room.video_enabled(), false);
            }
            Command::ScreenStart => {
                if !room.is_screen_shared() {
                    click_if_enabled(document, ids::START_SCREEN_BUTTON);
                }
            }
            Command::ScreenStop => {
                if room.is_screen_shared() {
                    click_if_enabled(document, ids::STOP_SCREEN_BUTTON);
                }
            }
            Command::Leave => room.leave_room(),
        }
    }
}

/// Click a toggle only when it is known to be in the opposite state.
fn set_toggle(document: &dyn Document, id: &str, current: Option<bool>, wanted: bool) {
    match current {
        Some(state) if state != wanted => {
            click_if_enabled(document, id);
        }
        Some(_) => debug!(element = id, wanted, "already in requested state"),
        None => debug!(element = id, "state unknown, command ignored"),
    }
}

/// Click the element `id` if it exists and is enabled.
pub(super) fn click_if_enabled(document: &dyn Document, id: &str) -> bool {
    match document.element_by_id(id) {
        Some(element) if !element.is_disabled() => {
            element.click();
            true
        }
        Some(_) => {
            debug!(element = id, "element disabled, click skipped");
            false
        }
        None => {
            debug!(element = id, "element not found");
            false
        }
    }
}
