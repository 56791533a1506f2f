//! A host page and its framed client wired together on the simulated
//! browser.

use std::cell::RefCell;
use std::rc::Rc;

use framelink_bridge::embed::ids;
use framelink_bridge::envelope::events;
use framelink_bridge::platform::{Document, Element, MountPoint, RoomClient};
use framelink_bridge::sim::{SimBrowser, SimDocument, SimMountPoint, SimRoom, SimWindow};
use framelink_bridge::{EmbedBridge, EmbedEnv, Handler, HostBridge, HostEnv};
use framelink_common::ConfigError;
use framelink_config::{EmbedConfig, FramelinkConfig};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::script::Step;

const HOST_PAGE_ORIGIN: &str = "https://host.localhost";

/// An event the host received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub at_ms: u64,
    pub event: String,
    pub payload: Value,
}

pub struct SimSession {
    browser: SimBrowser,
    host: HostBridge,
    child: SimWindow,
    document: Rc<SimDocument>,
    room: Rc<SimRoom>,
    timings: EmbedConfig,
    embed: Option<EmbedBridge>,
    transcript: Rc<RefCell<Vec<Record>>>,
}

impl SimSession {
    pub fn new(config: &FramelinkConfig) -> Result<Self, ConfigError> {
        let browser = SimBrowser::new();
        let page = browser.open_window(HOST_PAGE_ORIGIN);
        let mount = SimMountPoint::new(&page);
        let host = HostBridge::with_config(
            &config.host,
            HostEnv {
                bus: Rc::new(page.clone()),
                parent_node: Some(Rc::clone(&mount) as Rc<dyn MountPoint>),
            },
        )?;
        let child = mount
            .last_frame()
            .map(|frame| frame.window().clone())
            .ok_or_else(|| ConfigError::InvalidMountPoint("frame was not mounted".into()))?;

        let room = SimRoom::new();
        room.set_audio(Some(config.host.options.audio));
        room.set_video(Some(config.host.options.video));
        let document = client_document(&room);

        let transcript = Rc::new(RefCell::new(Vec::new()));
        for event in [
            events::READY,
            events::JOINED,
            events::TOOLBAR_CLICK,
            events::SCREEN_SHARE,
        ] {
            host.on(event, recorder(&browser, &transcript, event));
        }

        Ok(Self {
            browser,
            host,
            child,
            document,
            room,
            timings: config.embed,
            embed: None,
            transcript,
        })
    }

    pub fn host(&self) -> &HostBridge {
        &self.host
    }

    /// Play one step and let the browser settle.
    pub fn apply(&mut self, step: &Step) {
        match step {
            Step::Send(name) => {
                self.host.send(name, Value::Null);
            }
            Step::Boot => self.boot(),
            Step::Connect => self.room.set_connected(true),
            Step::Share(active) => self.room.set_screen_shared(*active),
            Step::Click(id) => match self.document.element_by_id(id) {
                Some(element) => element.click(),
                None => warn!(element = %id, "no such element"),
            },
            Step::Wait(duration) => self.browser.advance(*duration),
            Step::Destroy => self.host.destroy(),
            Step::Shutdown => {
                if let Some(embed) = &self.embed {
                    embed.shutdown();
                }
            }
        }
        self.browser.run_until_idle();
    }

    fn boot(&mut self) {
        if self.embed.is_some() {
            debug!("client already booted");
            return;
        }
        self.embed = Some(EmbedBridge::start(EmbedEnv {
            window: Rc::new(self.child.clone()),
            bus: Rc::new(self.child.clone()),
            document: Rc::clone(&self.document) as Rc<dyn Document>,
            room: Rc::clone(&self.room) as Rc<dyn RoomClient>,
            scheduler: Rc::new(self.browser.clone()),
            timings: self.timings,
        }));
    }

    pub fn transcript(&self) -> Vec<Record> {
        self.transcript.borrow().clone()
    }

    pub fn leave_count(&self) -> usize {
        self.room.leave_count()
    }
}

fn recorder(browser: &SimBrowser, transcript: &Rc<RefCell<Vec<Record>>>, event: &str) -> Handler {
    let browser = browser.clone();
    let transcript = Rc::clone(transcript);
    let event = event.to_string();
    Handler::new(move |payload| {
        transcript.borrow_mut().push(Record {
            at_ms: u64::try_from(browser.now().as_millis()).unwrap_or(u64::MAX),
            event: event.clone(),
            payload: payload.clone(),
        });
        Ok(())
    })
}

/// The client's toolbar. Buttons change the room state the way the real
/// client does when clicked.
fn client_document(room: &Rc<SimRoom>) -> Rc<SimDocument> {
    let document = SimDocument::new();
    for id in ids::TOOLBAR.into_iter().chain(ids::SCREEN_HINTS) {
        document.add(id);
    }

    let bind = |id: &str, action: Rc<dyn Fn(&SimRoom)>| {
        if let Some(element) = document.get(id) {
            let room = Rc::clone(room);
            element.add_click_listener(Rc::new(move || action(&room)));
        }
    };
    bind(
        ids::AUDIO_BUTTON,
        Rc::new(|room: &SimRoom| room.set_audio(room.audio_enabled().map(|on| !on))),
    );
    bind(
        ids::VIDEO_BUTTON,
        Rc::new(|room: &SimRoom| room.set_video(room.video_enabled().map(|on| !on))),
    );
    bind(
        ids::START_SCREEN_BUTTON,
        Rc::new(|room: &SimRoom| room.set_screen_shared(true)),
    );
    bind(
        ids::STOP_SCREEN_BUTTON,
        Rc::new(|room: &SimRoom| room.set_screen_shared(false)),
    );
    bind(ids::LEAVE_BUTTON, Rc::new(|room: &SimRoom| room.leave_room()));
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{parse_script, DEFAULT_SCRIPT};

    fn play(script: &str) -> SimSession {
        let mut session = SimSession::new(&FramelinkConfig::default()).unwrap();
        for step in parse_script(script).unwrap() {
            session.apply(&step);
        }
        session
    }

    fn events(session: &SimSession) -> Vec<String> {
        session
            .transcript()
            .into_iter()
            .map(|r| r.event)
            .collect()
    }

    #[test]
    fn default_script_transcript() {
        let session = play(DEFAULT_SCRIPT);
        let events = events(&session);
        assert_eq!(events[0], "ready");
        assert_eq!(events.iter().filter(|e| *e == "joined").count(), 1);
        assert_eq!(events.iter().filter(|e| *e == "screen.share").count(), 2);
        assert!(events.contains(&"toolbar.click".to_string()));
        assert_eq!(session.leave_count(), 1);
    }

    #[test]
    fn nothing_happens_without_boot() {
        let session = play("audio.on,connect,wait:5000");
        assert!(session.transcript().is_empty());
        assert_eq!(session.host().pending_len(), 1);
    }

    #[test]
    fn records_are_timestamped() {
        let session = play("boot,connect,wait:1000");
        let joined = session
            .transcript()
            .into_iter()
            .find(|r| r.event == "joined")
            .unwrap();
        assert_eq!(joined.at_ms, 1000);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = FramelinkConfig::default();
        config.host.domain = String::new();
        assert!(SimSession::new(&config).is_err());
    }
}
