//! Host side of the bridge.
//!
//! `HostBridge` mounts the embedded client into a container element, queues
//! commands until the client completes the handshake, and fans child events
//! out to registered handlers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use framelink_common::{ListenerId, TransportError, WindowId};
use serde_json::Value;
use tracing::{debug, warn};

use crate::commands::Command;
use crate::envelope::Envelope;
use crate::origin::OriginLock;
use crate::platform::{FrameHandle, FrameLoad, MessageBus, MountPoint};
use crate::registry::{Handler, ListenerRegistry};

mod handlers;
mod lifecycle;
pub mod params;
mod readiness;


pub use readiness::{PendingQueue, Readiness};

/// Page capabilities the host bridge needs.
#[derive(Clone)]
pub struct HostEnv {
    /// The host window's `message` channel.
    pub bus: Rc<dyn MessageBus>,
    /// Container the frame replaces the contents of.
    pub parent_node: Option<Rc<dyn MountPoint>>,
}

/// Handle to the host bridge. Clones share the same bridge.
#[derive(Clone)]
pub struct HostBridge {
    inner: Rc<HostInner>,
}

pub(crate) struct HostInner {
    /// Tag for log lines from this instance.
    instance: String,
    child_origin: String,
    frame_url: String,
    bus: Rc<dyn MessageBus>,
    frame: RefCell<Option<Rc<dyn FrameHandle>>>,
    /// Last `load`/`error` outcome reported by the frame element.
    frame_load: Cell<Option<FrameLoad>>,
    listener: Cell<Option<ListenerId>>,
    readiness: RefCell<Readiness>,
    origin: RefCell<OriginLock>,
    listeners: RefCell<ListenerRegistry>,
}

impl HostBridge {
    /// Register a handler for a child event. Registering the same handler
    /// twice has no effect.
    pub fn on(&self, event: &str, handler: Handler) -> &Self {
        self.inner.listeners.borrow_mut().add(event, handler);
        self
    }

    /// Remove a handler registered with [`HostBridge::on`].
    pub fn off(&self, event: &str, handler: &Handler) -> &Self {
        self.inner.listeners.borrow_mut().remove(event, handler);
        self
    }

    /// Register a handler that runs for the next matching event only.
    pub fn once(&self, event: &str, handler: Handler) -> &Self {
        self.inner.listeners.borrow_mut().add_once(event, handler);
        self
    }

    /// Send a command to the embedded client.
    ///
    /// Before the handshake the command is queued and flushed in order when
    /// the child reports ready. Afterwards it is posted immediately. Post
    /// failures are logged and the command is dropped.
    pub fn send(&self, name: &str, payload: Value) -> &Self {
        let envelope = Envelope::command(name, payload);
        let immediate = self.inner.readiness.borrow_mut().enqueue(envelope);
        match immediate {
            Some(envelope) => self.inner.post(&envelope),
            None => debug!(
                instance = %self.inner.instance,
                command = name,
                "child not ready, command queued"
            ),
        }
        self
    }

    pub fn send_command(&self, command: Command) -> &Self {
        self.send(command.as_str(), Value::Null)
    }

    pub fn start_audio(&self) -> &Self {
        self.send_command(Command::AudioOn)
    }

    pub fn stop_audio(&self) -> &Self {
        self.send_command(Command::AudioOff)
    }

    pub fn start_video(&self) -> &Self {
        self.send_command(Command::VideoOn)
    }

    pub fn stop_video(&self) -> &Self {
        self.send_command(Command::VideoOff)
    }

    pub fn start_screen(&self) -> &Self {
        self.send_command(Command::ScreenStart)
    }

    pub fn stop_screen(&self) -> &Self {
        self.send_command(Command::ScreenStop)
    }

    pub fn toggle_audio(&self) -> &Self {
        self.send_command(Command::AudioToggle)
    }

    pub fn toggle_video(&self) -> &Self {
        self.send_command(Command::VideoToggle)
    }

    pub fn toggle_screen(&self) -> &Self {
        self.send_command(Command::ScreenToggle)
    }

    pub fn leave(&self) -> &Self {
        self.send_command(Command::Leave)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.readiness.borrow().is_ready()
    }

    /// Commands waiting for the handshake.
    pub fn pending_len(&self) -> usize {
        self.inner.readiness.borrow().pending_len()
    }

    pub fn frame_url(&self) -> &str {
        &self.inner.frame_url
    }

    pub fn child_origin(&self) -> &str {
        &self.inner.child_origin
    }

    /// The mounted frame, `None` after [`HostBridge::destroy`].
    pub fn frame(&self) -> Option<Rc<dyn FrameHandle>> {
        self.inner.frame.borrow().clone()
    }

    /// How the frame's last navigation ended, `None` while still loading.
    pub fn frame_load(&self) -> Option<FrameLoad> {
        self.inner.frame_load.get()
    }

    pub fn is_listening(&self) -> bool {
        self.inner.listener.get().is_some()
    }

    /// Number of handlers registered for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.inner.listeners.borrow().count(event)
    }
}

impl HostInner {
    fn frame_window(&self) -> Option<WindowId> {
        let frame = self.frame.borrow();
        let window = frame.as_ref()?.content_window()?;
        Some(window.id())
    }

    /// Post an envelope to the frame's content window. Failures are logged
    /// and swallowed.
    fn post(&self, envelope: &Envelope) {
        if let Err(e) = self.try_post(envelope) {
            warn!(
                instance = %self.instance,
                name = %envelope.name,
                error = %e,
                "postMessage to child failed"
            );
        }
    }

    fn try_post(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let window = self
            .frame
            .borrow()
            .as_ref()
            .and_then(|frame| frame.content_window())
            .ok_or(TransportError::FrameDetached)?;
        let data = envelope.to_value()?;
        let target = self
            .origin
            .borrow()
            .locked_origin()
            .unwrap_or(&self.child_origin)
            .to_string();
        window.post_message(&data, &target)
    }
}
