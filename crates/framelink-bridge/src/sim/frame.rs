use std::cell::{Cell, RefCell};
use std::rc::Rc;

use framelink_common::ConfigError;

use crate::platform::{FrameHandle, FrameLoad, FrameLoadListener, FrameSpec, MountPoint, WindowRef};

use super::browser::SimWindow;

/// `scheme://host[:port]` prefix of an absolute URL.
pub fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    let host_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if host_len == 0 {
        return None;
    }
    Some(&url[..scheme_end + 3 + host_len])
}

/// A container element in a simulated window.
pub struct SimMountPoint {
    owner: SimWindow,
    attachable: bool,
    children: RefCell<Vec<Rc<SimFrame>>>,
}

impl SimMountPoint {
    pub fn new(owner: &SimWindow) -> Rc<Self> {
        Rc::new(Self {
            owner: owner.clone(),
            attachable: true,
            children: RefCell::new(Vec::new()),
        })
    }

    /// A node that cannot hold children, such as a text node.
    pub fn unattachable(owner: &SimWindow) -> Rc<Self> {
        Rc::new(Self {
            owner: owner.clone(),
            attachable: false,
            children: RefCell::new(Vec::new()),
        })
    }

    pub fn frames(&self) -> Vec<Rc<SimFrame>> {
        self.children.borrow().clone()
    }

    pub fn last_frame(&self) -> Option<Rc<SimFrame>> {
        self.children.borrow().last().cloned()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }
}

impl MountPoint for SimMountPoint {
    fn is_attachable(&self) -> bool {
        self.attachable
    }

    fn clear(&self) {
        let removed = std::mem::take(&mut *self.children.borrow_mut());
        for frame in removed {
            frame.detach();
        }
    }

    fn append_frame(&self, spec: &FrameSpec) -> Result<Rc<dyn FrameHandle>, ConfigError> {
        if !self.attachable {
            return Err(ConfigError::InvalidMountPoint(
                "node does not accept children".into(),
            ));
        }
        let origin = origin_of(&spec.src)
            .ok_or_else(|| ConfigError::InvalidTarget(format!("not an absolute url: {}", spec.src)))?;
        let window = self.owner.browser().open_frame(&self.owner, origin);
        let frame = Rc::new(SimFrame {
            spec: spec.clone(),
            owner: self.owner.clone(),
            window,
            attached: Cell::new(true),
            load_listeners: RefCell::new(Vec::new()),
        });
        self.children.borrow_mut().push(Rc::clone(&frame));
        Ok(frame)
    }
}

/// A frame element and its content window.
pub struct SimFrame {
    spec: FrameSpec,
    owner: SimWindow,
    window: SimWindow,
    attached: Cell<bool>,
    load_listeners: RefCell<Vec<FrameLoadListener>>,
}

impl SimFrame {
    pub fn spec(&self) -> &FrameSpec {
        &self.spec
    }

    /// The content window, for wiring the embedded side of a test.
    pub fn window(&self) -> &SimWindow {
        &self.window
    }

    /// Finish navigation, firing load listeners. Ignored once detached.
    pub fn finish_load(&self, outcome: FrameLoad) {
        if !self.attached.get() {
            return;
        }
        let listeners = self.load_listeners.borrow().clone();
        for listener in listeners {
            listener(outcome);
        }
    }
}

impl FrameHandle for SimFrame {
    fn content_window(&self) -> Option<Rc<dyn WindowRef>> {
        if !self.attached.get() {
            return None;
        }
        Some(self.owner.reference_to(self.window.id()))
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn detach(&self) {
        if self.attached.replace(false) {
            self.window.close();
        }
    }

    fn add_load_listener(&self, listener: FrameLoadListener) {
        self.load_listeners.borrow_mut().push(listener);
    }
}
