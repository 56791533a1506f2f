use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::platform::{ClickListener, Document, Element, RoomClient};

/// Element lookup by id.
#[derive(Default)]
pub struct SimDocument {
    elements: RefCell<HashMap<String, Rc<SimElement>>>,
}

impl SimDocument {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Insert an element, replacing any element with the same id.
    pub fn add(&self, id: &str) -> Rc<SimElement> {
        let element = Rc::new(SimElement {
            id: id.to_string(),
            disabled: Cell::new(false),
            clicks: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        });
        self.elements
            .borrow_mut()
            .insert(id.to_string(), Rc::clone(&element));
        element
    }

    pub fn get(&self, id: &str) -> Option<Rc<SimElement>> {
        self.elements.borrow().get(id).cloned()
    }
}

impl Document for SimDocument {
    fn element_by_id(&self, id: &str) -> Option<Rc<dyn Element>> {
        self.get(id).map(|e| e as Rc<dyn Element>)
    }
}

/// A clickable element that counts its clicks.
pub struct SimElement {
    id: String,
    disabled: Cell<bool>,
    clicks: Cell<usize>,
    listeners: RefCell<Vec<ClickListener>>,
}

impl SimElement {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Clicks that were dispatched (clicks on a disabled element are not).
    pub fn clicks(&self) -> usize {
        self.clicks.get()
    }
}

impl Element for SimElement {
    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    fn click(&self) {
        if self.disabled.get() {
            return;
        }
        self.clicks.set(self.clicks.get() + 1);
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    fn add_click_listener(&self, listener: ClickListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

/// Room client state a test can flip directly.
#[derive(Debug, Default)]
pub struct SimRoom {
    connected: Cell<bool>,
    screen_shared: Cell<bool>,
    audio: Cell<Option<bool>>,
    video: Cell<Option<bool>>,
    leaves: Cell<usize>,
}

impl SimRoom {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.set(connected);
    }

    pub fn set_screen_shared(&self, shared: bool) {
        self.screen_shared.set(shared);
    }

    /// `None` models a client that does not expose its microphone state.
    pub fn set_audio(&self, enabled: Option<bool>) {
        self.audio.set(enabled);
    }

    pub fn set_video(&self, enabled: Option<bool>) {
        self.video.set(enabled);
    }

    pub fn leave_count(&self) -> usize {
        self.leaves.get()
    }
}

impl RoomClient for SimRoom {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn is_screen_shared(&self) -> bool {
        self.screen_shared.get()
    }

    fn leave_room(&self) {
        self.leaves.set(self.leaves.get() + 1);
    }

    fn audio_enabled(&self) -> Option<bool> {
        self.audio.get()
    }

    fn video_enabled(&self) -> Option<bool> {
        self.video.get()
    }
}
