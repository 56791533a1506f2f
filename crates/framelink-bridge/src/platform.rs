//! Browser capabilities the bridge is built on.
//!
//! Each trait mirrors one piece of the page environment: the window message
//! channel, frame mounting, DOM element lookup, timers, and the conferencing
//! client running inside the frame. Everything is single-threaded, so the
//! traits use `Rc` callbacks and take `&self`.

use std::rc::Rc;
use std::time::Duration;

use framelink_common::{ConfigError, ListenerId, TimerId, TransportError, WindowId};
use serde_json::Value;

/// A message delivered to a window's `message` listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    /// Structured-clone of the posted data.
    pub data: Value,
    /// Origin of the sending window, e.g. `https://p2p.mirotalk.com`.
    pub origin: String,
    /// Sending window, when the platform exposes it.
    pub source: Option<WindowId>,
}

pub type MessageListener = Rc<dyn Fn(&MessageEvent)>;
pub type ClickListener = Rc<dyn Fn()>;

/// A reference to another window that can be posted to.
pub trait WindowRef {
    fn id(&self) -> WindowId;

    /// Queue `data` for delivery. `target_origin` is `*` or an exact origin;
    /// a mismatch makes the browser drop the message without error.
    fn post_message(&self, data: &Value, target_origin: &str) -> Result<(), TransportError>;
}

/// Registration point for `message` listeners on the current window.
pub trait MessageBus {
    fn add_message_listener(&self, listener: MessageListener) -> ListenerId;

    /// Returns `false` when the id was not registered.
    fn remove_message_listener(&self, id: ListenerId) -> bool;
}

/// Attributes of the frame element the host inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    pub src: String,
    /// Permissions policy (`allow` attribute).
    pub allow: String,
    pub width: String,
    pub height: String,
    pub border: String,
}

/// How a frame's navigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoad {
    Loaded,
    Failed,
}

pub type FrameLoadListener = Rc<dyn Fn(FrameLoad)>;

/// An inserted frame element.
pub trait FrameHandle {
    /// The frame's content window, `None` once detached.
    fn content_window(&self) -> Option<Rc<dyn WindowRef>>;

    fn is_attached(&self) -> bool;

    /// Remove the frame from the document. Safe to call repeatedly.
    fn detach(&self);

    /// Called on every `load` or `error` of the frame element.
    fn add_load_listener(&self, listener: FrameLoadListener);
}

/// The container element the host mounts the frame into.
pub trait MountPoint {
    /// Whether this node is a real element that accepts children.
    fn is_attachable(&self) -> bool;

    /// Remove all existing children.
    fn clear(&self);

    fn append_frame(&self, spec: &FrameSpec) -> Result<Rc<dyn FrameHandle>, ConfigError>;
}

/// The embedded page's view of its own window.
pub trait ChildWindow {
    /// `window.self === window.top`.
    fn is_top_level(&self) -> bool;

    /// The parent window. A top-level window is its own parent.
    fn parent(&self) -> Rc<dyn WindowRef>;
}

/// A DOM element the embed side can click or observe.
pub trait Element {
    fn is_disabled(&self) -> bool;
    fn click(&self);
    fn add_click_listener(&self, listener: ClickListener);
}

pub trait Document {
    fn element_by_id(&self, id: &str) -> Option<Rc<dyn Element>>;
}

/// `setInterval` / `setTimeout`.
pub trait Scheduler {
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId;
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a timer. Unknown or already-fired ids are ignored.
    fn clear_timer(&self, id: TimerId);
}

/// The conferencing client running in the embedded page.
pub trait RoomClient {
    fn is_connected(&self) -> bool;
    fn is_screen_shared(&self) -> bool;
    fn leave_room(&self);

    /// Local microphone state, when the client exposes it.
    fn audio_enabled(&self) -> Option<bool> {
        None
    }

    /// Local camera state, when the client exposes it.
    fn video_enabled(&self) -> Option<bool> {
        None
    }
}
