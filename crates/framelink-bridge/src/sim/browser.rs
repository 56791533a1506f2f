use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use framelink_common::{ListenerId, TimerId, TransportError, WindowId};
use serde_json::Value;
use tracing::trace;

use crate::envelope::WILDCARD_ORIGIN;
use crate::platform::{
    ChildWindow, MessageBus, MessageEvent, MessageListener, Scheduler, WindowRef,
};

/// Shortest interval period the clock will schedule.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct WindowState {
    origin: String,
    parent: Option<WindowId>,
    closed: bool,
    listeners: Vec<(ListenerId, MessageListener)>,
    /// Every message delivered to this window, in delivery order.
    inbox: Vec<MessageEvent>,
}

struct Delivery {
    target: WindowId,
    target_origin: String,
    event: MessageEvent,
}

enum TimerKind {
    Interval {
        period: Duration,
        callback: Rc<dyn Fn()>,
    },
    Timeout(Box<dyn FnOnce()>),
}

struct Timer {
    due: Duration,
    kind: TimerKind,
}

#[derive(Default)]
struct BrowserInner {
    windows: RefCell<HashMap<WindowId, WindowState>>,
    queue: RefCell<VecDeque<Delivery>>,
    timers: RefCell<HashMap<TimerId, Timer>>,
    now: Cell<Duration>,
    next_id: Cell<u64>,
    dropped: Cell<usize>,
}

/// Handle to the simulated browser. Clones share the same state.
#[derive(Clone, Default)]
pub struct SimBrowser {
    inner: Rc<BrowserInner>,
}

impl SimBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        id
    }

    /// Open a top-level window served from `origin`.
    pub fn open_window(&self, origin: &str) -> SimWindow {
        self.create_window(origin, None)
    }

    /// Open a nested browsing context inside `parent`.
    pub fn open_frame(&self, parent: &SimWindow, origin: &str) -> SimWindow {
        self.create_window(origin, Some(parent.id))
    }

    fn create_window(&self, origin: &str, parent: Option<WindowId>) -> SimWindow {
        let id = WindowId(self.next_id());
        self.inner.windows.borrow_mut().insert(
            id,
            WindowState {
                origin: origin.to_string(),
                parent,
                closed: false,
                listeners: Vec::new(),
                inbox: Vec::new(),
            },
        );
        trace!(window = %id, origin, "window opened");
        SimWindow {
            browser: self.clone(),
            id,
        }
    }

    /// Close a window. Its listeners are dropped and later posts to it fail.
    pub fn close(&self, id: WindowId) {
        if let Some(window) = self.inner.windows.borrow_mut().get_mut(&id) {
            window.closed = true;
            window.listeners.clear();
        }
    }

    /// Unknown windows count as closed.
    pub fn is_closed(&self, id: WindowId) -> bool {
        self.inner
            .windows
            .borrow()
            .get(&id)
            .map_or(true, |w| w.closed)
    }

    /// Current virtual time since the browser was created.
    pub fn now(&self) -> Duration {
        self.inner.now.get()
    }

    /// Messages posted but not yet delivered.
    pub fn pending_messages(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Messages discarded at delivery because of a target origin mismatch or
    /// a window that closed in flight.
    pub fn dropped(&self) -> usize {
        self.inner.dropped.get()
    }

    pub fn active_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    /// Deliver queued messages and fire timers due at the current time until
    /// nothing is left to do. Returns the number of messages delivered.
    pub fn run_until_idle(&self) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            match next {
                Some(delivery) => {
                    if self.deliver(delivery) {
                        delivered += 1;
                    }
                }
                None => {
                    if !self.fire_next_due(self.now()) {
                        break;
                    }
                }
            }
        }
        delivered
    }

    /// Move the clock forward by `by`, firing timers in due order and
    /// delivering any messages they produce along the way.
    pub fn advance(&self, by: Duration) {
        let until = self.now() + by;
        loop {
            self.run_until_idle();
            let Some(due) = self.next_due(until) else {
                break;
            };
            self.inner.now.set(due);
        }
        self.inner.now.set(until);
        self.run_until_idle();
    }

    fn next_due(&self, until: Duration) -> Option<Duration> {
        self.inner
            .timers
            .borrow()
            .values()
            .map(|t| t.due)
            .filter(|due| *due <= until)
            .min()
    }

    fn fire_next_due(&self, now: Duration) -> bool {
        let next = self
            .inner
            .timers
            .borrow()
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(id, timer)| (timer.due, id.0))
            .map(|(id, _)| *id);
        let Some(id) = next else {
            return false;
        };

        let callback: Box<dyn FnOnce()> = {
            let mut timers = self.inner.timers.borrow_mut();
            match timers.remove(&id) {
                Some(Timer {
                    due,
                    kind: TimerKind::Interval { period, callback },
                }) => {
                    timers.insert(
                        id,
                        Timer {
                            due: due + period,
                            kind: TimerKind::Interval {
                                period,
                                callback: Rc::clone(&callback),
                            },
                        },
                    );
                    Box::new(move || callback())
                }
                Some(Timer {
                    kind: TimerKind::Timeout(callback),
                    ..
                }) => callback,
                None => return false,
            }
        };
        trace!(timer = %id, "timer fired");
        callback();
        true
    }

    fn enqueue(
        &self,
        source: WindowId,
        target: WindowId,
        data: &Value,
        target_origin: &str,
    ) -> Result<(), TransportError> {
        if self.is_closed(target) {
            return Err(TransportError::WindowClosed(target));
        }
        let origin = self
            .inner
            .windows
            .borrow()
            .get(&source)
            .map(|w| w.origin.clone())
            .unwrap_or_default();
        self.inner.queue.borrow_mut().push_back(Delivery {
            target,
            target_origin: target_origin.to_string(),
            event: MessageEvent {
                data: data.clone(),
                origin,
                source: Some(source),
            },
        });
        Ok(())
    }

    fn deliver(&self, delivery: Delivery) -> bool {
        let listeners = {
            let mut windows = self.inner.windows.borrow_mut();
            match windows.get_mut(&delivery.target) {
                Some(window)
                    if !window.closed
                        && (delivery.target_origin == WILDCARD_ORIGIN
                            || delivery.target_origin == window.origin) =>
                {
                    window.inbox.push(delivery.event.clone());
                    window
                        .listeners
                        .iter()
                        .map(|(_, listener)| Rc::clone(listener))
                        .collect::<Vec<_>>()
                }
                _ => {
                    trace!(
                        target = %delivery.target,
                        target_origin = %delivery.target_origin,
                        "message dropped at delivery"
                    );
                    self.inner.dropped.set(self.inner.dropped.get() + 1);
                    return false;
                }
            }
        };
        for listener in listeners {
            listener(&delivery.event);
        }
        true
    }
}

impl Scheduler for SimBrowser {
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerId {
        let id = TimerId(self.next_id());
        let period = period.max(MIN_INTERVAL);
        self.inner.timers.borrow_mut().insert(
            id,
            Timer {
                due: self.now() + period,
                kind: TimerKind::Interval { period, callback },
            },
        );
        id
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id());
        self.inner.timers.borrow_mut().insert(
            id,
            Timer {
                due: self.now() + delay,
                kind: TimerKind::Timeout(callback),
            },
        );
        id
    }

    fn clear_timer(&self, id: TimerId) {
        self.inner.timers.borrow_mut().remove(&id);
    }
}

/// One simulated window.
#[derive(Clone)]
pub struct SimWindow {
    browser: SimBrowser,
    id: WindowId,
}

impl SimWindow {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn browser(&self) -> &SimBrowser {
        &self.browser
    }

    pub fn origin(&self) -> String {
        self.browser
            .inner
            .windows
            .borrow()
            .get(&self.id)
            .map(|w| w.origin.clone())
            .unwrap_or_default()
    }

    /// A reference to `target` as seen from this window.
    pub fn reference_to(&self, target: WindowId) -> Rc<dyn WindowRef> {
        Rc::new(SimWindowRef {
            browser: self.browser.clone(),
            target,
            caller: self.id,
        })
    }

    /// `target.postMessage(data, target_origin)` with this window as sender.
    pub fn post_to(
        &self,
        target: WindowId,
        data: &Value,
        target_origin: &str,
    ) -> Result<(), TransportError> {
        self.browser.enqueue(self.id, target, data, target_origin)
    }

    /// Messages delivered to this window so far.
    pub fn inbox(&self) -> Vec<MessageEvent> {
        self.browser
            .inner
            .windows
            .borrow()
            .get(&self.id)
            .map(|w| w.inbox.clone())
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.browser
            .inner
            .windows
            .borrow()
            .get(&self.id)
            .map_or(0, |w| w.listeners.len())
    }

    /// Load a document from another origin into this window. Listeners
    /// registered by the previous document are dropped.
    pub fn navigate(&self, origin: &str) {
        if let Some(window) = self.browser.inner.windows.borrow_mut().get_mut(&self.id) {
            window.origin = origin.to_string();
            window.listeners.clear();
        }
    }

    pub fn close(&self) {
        self.browser.close(self.id);
    }

    pub fn is_closed(&self) -> bool {
        self.browser.is_closed(self.id)
    }

    fn parent_id(&self) -> Option<WindowId> {
        self.browser
            .inner
            .windows
            .borrow()
            .get(&self.id)
            .and_then(|w| w.parent)
    }
}

impl MessageBus for SimWindow {
    fn add_message_listener(&self, listener: MessageListener) -> ListenerId {
        let id = ListenerId(self.browser.next_id());
        if let Some(window) = self.browser.inner.windows.borrow_mut().get_mut(&self.id) {
            window.listeners.push((id, listener));
        }
        id
    }

    fn remove_message_listener(&self, id: ListenerId) -> bool {
        let mut windows = self.browser.inner.windows.borrow_mut();
        let Some(window) = windows.get_mut(&self.id) else {
            return false;
        };
        let before = window.listeners.len();
        window.listeners.retain(|(lid, _)| *lid != id);
        window.listeners.len() != before
    }
}

impl ChildWindow for SimWindow {
    fn is_top_level(&self) -> bool {
        self.parent_id().is_none()
    }

    fn parent(&self) -> Rc<dyn WindowRef> {
        self.reference_to(self.parent_id().unwrap_or(self.id))
    }
}

/// `WindowRef` to a simulated window, posting as `caller`.
pub struct SimWindowRef {
    browser: SimBrowser,
    target: WindowId,
    caller: WindowId,
}

impl WindowRef for SimWindowRef {
    fn id(&self) -> WindowId {
        self.target
    }

    fn post_message(&self, data: &Value, target_origin: &str) -> Result<(), TransportError> {
        self.browser.enqueue(self.caller, self.target, data, target_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorder(window: &SimWindow) -> Rc<RefCell<Vec<MessageEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        window.add_message_listener(Rc::new(move |event: &MessageEvent| {
            sink.borrow_mut().push(event.clone());
        }));
        seen
    }

    #[test]
    fn delivery_is_asynchronous() {
        let browser = SimBrowser::new();
        let host = browser.open_window("https://host.example");
        let child = browser.open_frame(&host, "https://child.example");
        let seen = recorder(&host);

        child.parent().post_message(&json!({"n": 1}), "*").unwrap();
        assert!(seen.borrow().is_empty());
        assert_eq!(browser.pending_messages(), 1);

        assert_eq!(browser.run_until_idle(), 1);
        let seen = seen.borrow();
        assert_eq!(seen[0].origin, "https://child.example");
        assert_eq!(seen[0].source, Some(child.id()));
    }

    #[test]
    fn target_origin_mismatch_is_dropped() {
        let browser = SimBrowser::new();
        let host = browser.open_window("https://host.example");
        let child = browser.open_frame(&host, "https://child.example");
        let seen = recorder(&child);

        host.post_to(child.id(), &json!({}), "https://other.example").unwrap();
        host.post_to(child.id(), &json!({}), "https://child.example").unwrap();
        browser.run_until_idle();

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(browser.dropped(), 1);
    }

    #[test]
    fn posting_to_closed_window_fails() {
        let browser = SimBrowser::new();
        let host = browser.open_window("https://host.example");
        let child = browser.open_frame(&host, "https://child.example");
        child.close();

        let err = host.post_to(child.id(), &json!({}), "*").unwrap_err();
        assert!(matches!(err, TransportError::WindowClosed(id) if id == child.id()));
    }

    #[test]
    fn top_level_window_is_its_own_parent() {
        let browser = SimBrowser::new();
        let host = browser.open_window("https://host.example");
        let child = browser.open_frame(&host, "https://child.example");
        assert!(host.is_top_level());
        assert_eq!(host.parent().id(), host.id());
        assert!(!child.is_top_level());
        assert_eq!(child.parent().id(), host.id());
    }

    #[test]
    fn remove_listener_by_id() {
        let browser = SimBrowser::new();
        let host = browser.open_window("https://host.example");
        let id = host.add_message_listener(Rc::new(|_: &MessageEvent| {}));
        assert_eq!(host.listener_count(), 1);
        assert!(host.remove_message_listener(id));
        assert!(!host.remove_message_listener(id));
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn intervals_fire_on_the_virtual_clock() {
        let browser = SimBrowser::new();
        let ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&ticks);
        let id = browser.set_interval(
            Duration::from_millis(100),
            Rc::new(move || counter.set(counter.get() + 1)),
        );

        browser.advance(Duration::from_millis(99));
        assert_eq!(ticks.get(), 0);
        browser.advance(Duration::from_millis(1));
        assert_eq!(ticks.get(), 1);
        browser.advance(Duration::from_millis(250));
        assert_eq!(ticks.get(), 3);

        browser.clear_timer(id);
        browser.advance(Duration::from_secs(1));
        assert_eq!(ticks.get(), 3);
        assert_eq!(browser.active_timers(), 0);
    }

    #[test]
    fn timeouts_fire_once_in_due_order() {
        let browser = SimBrowser::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "late"), (10, "early"), (20, "middle")] {
            let order = Rc::clone(&order);
            browser.set_timeout(
                Duration::from_millis(delay),
                Box::new(move || order.borrow_mut().push(tag)),
            );
        }
        browser.advance(Duration::from_millis(100));
        assert_eq!(*order.borrow(), vec!["early", "middle", "late"]);
        assert_eq!(browser.active_timers(), 0);
        assert_eq!(browser.now(), Duration::from_millis(100));
    }
}
