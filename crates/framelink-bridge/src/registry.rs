//! Event listener registry for the host bridge.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use framelink_common::HandlerError;
use serde_json::Value;

pub type HandlerResult = Result<(), HandlerError>;

/// A cloneable event handler. Identity is the underlying allocation, so a
/// clone of a handler refers to the same handler for `off`.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Value) -> HandlerResult>);

impl Handler {
    pub fn new(f: impl Fn(&Value) -> HandlerResult + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, payload: &Value) -> HandlerResult {
        (self.0)(payload)
    }

    /// Whether both handles point at the same handler.
    pub fn same(&self, other: &Handler) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0))
    }
}

/// Persistent and one-shot handlers keyed by event name. Handlers run in
/// registration order.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    persistent: HashMap<String, Vec<Handler>>,
    once: HashMap<String, Vec<Handler>>,
}

fn insert_unique(map: &mut HashMap<String, Vec<Handler>>, event: &str, handler: Handler) -> bool {
    let handlers = map.entry(event.to_string()).or_default();
    if handlers.iter().any(|h| h.same(&handler)) {
        return false;
    }
    handlers.push(handler);
    true
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a persistent handler. Returns `false` if it was already registered.
    pub fn add(&mut self, event: &str, handler: Handler) -> bool {
        insert_unique(&mut self.persistent, event, handler)
    }

    /// Remove a persistent handler. Returns `false` if it was not registered.
    pub fn remove(&mut self, event: &str, handler: &Handler) -> bool {
        let Some(handlers) = self.persistent.get_mut(event) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|h| !h.same(handler));
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.persistent.remove(event);
        }
        removed
    }

    /// Add a one-shot handler. Returns `false` if it was already registered.
    pub fn add_once(&mut self, event: &str, handler: Handler) -> bool {
        insert_unique(&mut self.once, event, handler)
    }

    /// Snapshot of the persistent handlers for `event`.
    pub fn handlers(&self, event: &str) -> Vec<Handler> {
        self.persistent.get(event).cloned().unwrap_or_default()
    }

    /// Remove and return the one-shot handlers for `event`.
    pub fn take_once(&mut self, event: &str) -> Vec<Handler> {
        self.once.remove(event).unwrap_or_default()
    }

    /// Number of handlers (persistent and one-shot) registered for `event`.
    pub fn count(&self, event: &str) -> usize {
        self.persistent.get(event).map_or(0, Vec::len) + self.once.get(event).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty() && self.once.is_empty()
    }

    pub fn clear(&mut self) {
        self.persistent.clear();
        self.once.clear();
    }
}
