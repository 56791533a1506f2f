//! Embedded side of the bridge.
//!
//! `EmbedBridge` runs inside the framed conferencing client. It announces
//! readiness to the parent, turns host commands into clicks on the local
//! toolbar, and reports toolbar clicks, join completion, and screen-share
//! changes back up.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use framelink_common::{new_correlation_id, ListenerId, TimerId};
use framelink_config::EmbedConfig;
use serde_json::{json, Value};
use tracing::{debug, info, trace, warn};

use crate::envelope::{events, handshake, Action, Envelope, Scope};
use crate::origin::OriginLock;
use crate::platform::{
    ChildWindow, Document, MessageBus, MessageEvent, RoomClient, Scheduler, WindowRef,
};

mod commands;
mod global;
pub mod monitor;


pub use global::{install, installed, teardown};
use monitor::{JoinState, ScreenShareGate};

/// Element ids of the conferencing client's UI.
pub mod ids {
    pub const AUDIO_BUTTON: &str = "audioBtn";
    pub const VIDEO_BUTTON: &str = "videoBtn";
    pub const SCREEN_SHARE_BUTTON: &str = "screenShareBtn";
    pub const LEAVE_BUTTON: &str = "leaveRoomBtn";
    pub const START_SCREEN_BUTTON: &str = "startScreenButton";
    pub const STOP_SCREEN_BUTTON: &str = "stopScreenButton";

    /// Buttons whose clicks are reported as `toolbar.click`.
    pub const TOOLBAR: [&str; 4] = [
        AUDIO_BUTTON,
        VIDEO_BUTTON,
        SCREEN_SHARE_BUTTON,
        LEAVE_BUTTON,
    ];

    /// Buttons whose clicks hint at a screen-share change.
    pub const SCREEN_HINTS: [&str; 2] = [START_SCREEN_BUTTON, STOP_SCREEN_BUTTON];
}

/// Page capabilities the embed bridge needs.
#[derive(Clone)]
pub struct EmbedEnv {
    pub window: Rc<dyn ChildWindow>,
    /// The embedded window's `message` channel.
    pub bus: Rc<dyn MessageBus>,
    pub document: Rc<dyn Document>,
    pub room: Rc<dyn RoomClient>,
    pub scheduler: Rc<dyn Scheduler>,
    pub timings: EmbedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not embedded; nothing was registered.
    Inert,
    Running,
    ShutDown,
}

/// Handle to the embed bridge. Clones share the same bridge.
#[derive(Clone)]
pub struct EmbedBridge {
    inner: Rc<EmbedInner>,
}

pub(crate) struct EmbedInner {
    instance: String,
    env: EmbedEnv,
    parent: Rc<dyn WindowRef>,
    phase: Cell<Phase>,
    origin: RefCell<OriginLock>,
    listener: Cell<Option<ListenerId>>,
    join: Cell<JoinState>,
    screen: Cell<ScreenShareGate>,
    screen_poller: Cell<Option<TimerId>>,
    /// Pending check scheduled by a start/stop click.
    screen_hint: Cell<Option<TimerId>>,
}

impl EmbedBridge {
    /// Boot the bridge. When the window is not framed the bridge stays inert
    /// and registers nothing.
    pub fn start(env: EmbedEnv) -> Self {
        let embedded = !env.window.is_top_level();
        let inner = Rc::new(EmbedInner {
            instance: new_correlation_id(),
            parent: env.window.parent(),
            env,
            phase: Cell::new(Phase::Inert),
            origin: RefCell::new(OriginLock::default()),
            listener: Cell::new(None),
            join: Cell::new(JoinState::Idle),
            screen: Cell::new(ScreenShareGate::default()),
            screen_poller: Cell::new(None),
            screen_hint: Cell::new(None),
        });
        let bridge = Self { inner };
        if !embedded {
            debug!(instance = %bridge.inner.instance, "top-level window, bridge inert");
            return bridge;
        }

        bridge.inner.phase.set(Phase::Running);
        bridge.listen();
        bridge.wire_toolbar();
        bridge.start_join_poller();
        bridge.start_screen_monitor();
        bridge
            .inner
            .post_to_parent(&Envelope::handshake(Scope::Child, handshake::READY));
        info!(instance = %bridge.inner.instance, "embed bridge started");
        bridge
    }

    fn weak(&self) -> Weak<EmbedInner> {
        Rc::downgrade(&self.inner)
    }

    fn listen(&self) {
        let weak = self.weak();
        let id = self
            .inner
            .env
            .bus
            .add_message_listener(Rc::new(move |event: &MessageEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_message(event);
                }
            }));
        self.inner.listener.set(Some(id));
    }

    fn wire_toolbar(&self) {
        for id in ids::TOOLBAR {
            let Some(element) = self.inner.env.document.element_by_id(id) else {
                debug!(element = id, "toolbar button missing");
                continue;
            };
            let weak = self.weak();
            element.add_click_listener(Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.post_event(events::TOOLBAR_CLICK, json!({ "id": id }));
                }
            }));
        }
    }

    fn start_join_poller(&self) {
        let weak = self.weak();
        let timer = self.inner.env.scheduler.set_interval(
            self.inner.env.timings.join_poll_interval(),
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.poll_join();
                }
            }),
        );
        self.inner.join.set(JoinState::Polling(timer));
    }

    fn start_screen_monitor(&self) {
        for id in ids::SCREEN_HINTS {
            let Some(element) = self.inner.env.document.element_by_id(id) else {
                continue;
            };
            let weak = self.weak();
            element.add_click_listener(Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.schedule_screen_hint();
                }
            }));
        }

        let weak = self.weak();
        let timer = self.inner.env.scheduler.set_interval(
            self.inner.env.timings.screen_poll_interval(),
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.check_screen_share();
                }
            }),
        );
        self.inner.screen_poller.set(Some(timer));
    }

    /// Cancel timers and stop listening. Safe to call more than once.
    pub fn shutdown(&self) {
        let inner = &self.inner;
        if inner.phase.replace(Phase::ShutDown) != Phase::Running {
            return;
        }
        if let Some(id) = inner.listener.take() {
            inner.env.bus.remove_message_listener(id);
        }
        let mut join = inner.join.get();
        let timers = [join.stop(), inner.screen_poller.take(), inner.screen_hint.take()];
        inner.join.set(join);
        for timer in timers.into_iter().flatten() {
            inner.env.scheduler.clear_timer(timer);
        }
        debug!(instance = %inner.instance, "embed bridge shut down");
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Current lock on the parent origin.
    pub fn origin_lock(&self) -> OriginLock {
        self.inner.origin.borrow().clone()
    }

    pub fn has_joined(&self) -> bool {
        self.inner.join.get().has_joined()
    }

    /// Screen-share state last reported to the parent.
    pub fn screen_shared(&self) -> bool {
        self.inner.screen.get().last()
    }

    /// Report an event to the parent.
    pub fn emit(&self, name: &str, payload: Value) {
        self.inner.post_event(name, payload);
    }
}

impl EmbedInner {
    fn is_running(&self) -> bool {
        self.phase.get() == Phase::Running
    }

    fn handle_message(&self, event: &MessageEvent) {
        let envelope = match Envelope::parse(&event.data) {
            Ok(envelope) => envelope,
            Err(rejection) => {
                trace!(instance = %self.instance, %rejection, "ignoring message");
                return;
            }
        };
        if event.source != Some(self.parent.id()) || envelope.scope != Scope::Parent {
            trace!(
                instance = %self.instance,
                name = %envelope.name,
                "ignoring message not from parent"
            );
            return;
        }
        if !self.origin.borrow_mut().admit(&event.origin) {
            trace!(
                instance = %self.instance,
                origin = %event.origin,
                "ignoring message from unexpected origin"
            );
            return;
        }

        match envelope.action {
            Action::Command => self.dispatch(&envelope.name),
            Action::Handshake if envelope.name == handshake::ACK => {
                debug!(instance = %self.instance, "parent acknowledged")
            }
            _ => trace!(
                instance = %self.instance,
                action = ?envelope.action,
                name = %envelope.name,
                "ignoring unexpected envelope"
            ),
        }
    }

    fn post_event(&self, name: &str, payload: Value) {
        self.post_to_parent(&Envelope::event(name, payload));
    }

    /// Post to the parent window, targeting the locked origin or `*` before
    /// the lock is set.
    fn post_to_parent(&self, envelope: &Envelope) {
        if !self.is_running() {
            debug!(
                instance = %self.instance,
                name = %envelope.name,
                "bridge not running, envelope dropped"
            );
            return;
        }
        let target = self.origin.borrow().target().to_string();
        let result = envelope
            .to_value()
            .map_err(Into::into)
            .and_then(|data| self.parent.post_message(&data, &target));
        if let Err(e) = result {
            warn!(
                instance = %self.instance,
                name = %envelope.name,
                error = %e,
                "postMessage to parent failed"
            );
        }
    }

    fn poll_join(&self) {
        if !self.is_running() || !self.env.room.is_connected() {
            return;
        }
        let mut join = self.join.get();
        let finished = join.connected();
        self.join.set(join);
        if let Some(timer) = finished {
            self.env.scheduler.clear_timer(timer);
            self.post_event(events::JOINED, Value::Null);
        }
    }

    fn schedule_screen_hint(self: &Rc<Self>) {
        if !self.is_running() || self.screen_hint.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let timer = self.env.scheduler.set_timeout(
            self.env.timings.screen_hint_delay(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.screen_hint.set(None);
                    inner.check_screen_share();
                }
            }),
        );
        self.screen_hint.set(Some(timer));
    }

    fn check_screen_share(&self) {
        if !self.is_running() {
            return;
        }
        let mut gate = self.screen.get();
        let changed = gate.observe(self.env.room.is_screen_shared());
        self.screen.set(gate);
        if let Some(active) = changed {
            self.post_event(events::SCREEN_SHARE, json!({ "active": active }));
        }
    }
}
