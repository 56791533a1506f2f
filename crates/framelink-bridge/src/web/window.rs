use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use framelink_common::{ListenerId, TimerId, TransportError, WindowId};
use js_sys::{Function, Object, JSON};
use serde_json::Value;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::platform::{
    ChildWindow, MessageBus, MessageEvent, MessageListener, Scheduler, WindowRef,
};

thread_local! {
    /// Window objects seen so far, keyed by identity.
    static KNOWN_WINDOWS: RefCell<Vec<(JsValue, WindowId)>> = const { RefCell::new(Vec::new()) };
    static NEXT_WINDOW: Cell<u64> = const { Cell::new(1) };
}

/// Stable id for a window object. The same `WindowProxy` always maps to the
/// same id.
pub(crate) fn window_id(window: &JsValue) -> WindowId {
    KNOWN_WINDOWS.with(|known| {
        let mut known = known.borrow_mut();
        if let Some((_, id)) = known.iter().find(|(seen, _)| Object::is(seen, window)) {
            return *id;
        }
        let id = WindowId(NEXT_WINDOW.with(|next| next.replace(next.get() + 1)));
        known.push((window.clone(), id));
        id
    })
}

/// Browser timer delay in milliseconds, saturating at `i32::MAX`.
pub fn millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

fn to_js(data: &Value) -> Result<JsValue, TransportError> {
    let text = serde_json::to_string(data)?;
    JSON::parse(&text).map_err(|e| TransportError::Rejected(format!("{:?}", e)))
}

/// Posted data as JSON. Values `JSON.stringify` cannot represent read as
/// `null` and fail envelope parsing downstream.
fn from_js(data: &JsValue) -> Value {
    JSON::stringify(data)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null)
}

/// A window the current page holds a reference to.
pub struct WebWindowRef {
    id: WindowId,
    window: web_sys::Window,
}

impl WebWindowRef {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            id: window_id(&window),
            window,
        }
    }
}

impl WindowRef for WebWindowRef {
    fn id(&self) -> WindowId {
        self.id
    }

    fn post_message(&self, data: &Value, target_origin: &str) -> Result<(), TransportError> {
        let message = to_js(data)?;
        self.window
            .post_message(&message, target_origin)
            .map_err(|e| TransportError::Rejected(format!("{:?}", e)))
    }
}

/// The window this page runs in.
pub struct WebWindow {
    window: web_sys::Window,
    next_listener: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, Closure<dyn Fn(web_sys::MessageEvent)>>>,
}

impl WebWindow {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            next_listener: Cell::new(1),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// The global `window`, `None` outside a browser main thread.
    pub fn current() -> Option<Rc<Self>> {
        web_sys::window().map(|window| Rc::new(Self::new(window)))
    }

    pub fn raw(&self) -> &web_sys::Window {
        &self.window
    }
}

impl MessageBus for WebWindow {
    fn add_message_listener(&self, listener: MessageListener) -> ListenerId {
        let id = ListenerId(self.next_listener.replace(self.next_listener.get() + 1));
        let callback: Closure<dyn Fn(web_sys::MessageEvent)> =
            Closure::new(move |event: web_sys::MessageEvent| {
                let message = MessageEvent {
                    data: from_js(&event.data()),
                    origin: event.origin(),
                    source: event.source().map(|source| window_id(&source)),
                };
                listener(&message);
            });
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
        {
            warn!(error = ?e, "failed to add message listener");
        }
        self.listeners.borrow_mut().insert(id, callback);
        id
    }

    fn remove_message_listener(&self, id: ListenerId) -> bool {
        let Some(callback) = self.listeners.borrow_mut().remove(&id) else {
            return false;
        };
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
        {
            warn!(error = ?e, "failed to remove message listener");
        }
        true
    }
}

impl ChildWindow for WebWindow {
    fn is_top_level(&self) -> bool {
        match self.window.top() {
            Ok(Some(top)) => Object::is(&top, &self.window),
            _ => false,
        }
    }

    fn parent(&self) -> Rc<dyn WindowRef> {
        let parent = match self.window.parent() {
            Ok(Some(parent)) => parent,
            _ => self.window.clone(),
        };
        Rc::new(WebWindowRef::new(parent))
    }
}

/// `setInterval` / `setTimeout` on a window.
pub struct WebScheduler {
    window: web_sys::Window,
    intervals: RefCell<HashMap<TimerId, Closure<dyn Fn()>>>,
}

impl WebScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            intervals: RefCell::new(HashMap::new()),
        }
    }
}

impl Scheduler for WebScheduler {
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId {
        let tick: Closure<dyn Fn()> = Closure::new(move || callback());
        match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            millis(period),
        ) {
            Ok(handle) => {
                let id = TimerId(handle as u64);
                self.intervals.borrow_mut().insert(id, tick);
                id
            }
            Err(e) => {
                warn!(error = ?e, "setInterval failed");
                TimerId(0)
            }
        }
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let fire = Closure::once_into_js(move || callback());
        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            fire.unchecked_ref::<Function>(),
            millis(delay),
        ) {
            Ok(handle) => TimerId(handle as u64),
            Err(e) => {
                warn!(error = ?e, "setTimeout failed");
                TimerId(0)
            }
        }
    }

    fn clear_timer(&self, id: TimerId) {
        let Ok(handle) = i32::try_from(id.0) else {
            return;
        };
        // Timeouts and intervals share one handle space.
        self.window.clear_interval_with_handle(handle);
        self.intervals.borrow_mut().remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_rounds_down_and_saturates() {
        assert_eq!(millis(Duration::from_micros(1_999)), 1);
        assert_eq!(millis(Duration::from_millis(500)), 500);
        assert_eq!(millis(Duration::from_secs(u64::MAX)), i32::MAX);
    }
}
