use std::cell::RefCell;
use std::rc::Rc;

use framelink_common::ConfigError;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlIFrameElement, Node};

use crate::platform::{FrameHandle, FrameLoad, FrameLoadListener, FrameSpec, MountPoint, WindowRef};

use super::window::WebWindowRef;

fn mount_error(e: wasm_bindgen::JsValue) -> ConfigError {
    ConfigError::InvalidMountPoint(format!("{:?}", e))
}

/// A DOM node the host mounts the frame into.
pub struct WebMountPoint {
    node: Node,
}

impl WebMountPoint {
    pub fn new(node: Node) -> Self {
        Self { node }
    }
}

impl MountPoint for WebMountPoint {
    fn is_attachable(&self) -> bool {
        self.node.node_type() == Node::ELEMENT_NODE
    }

    fn clear(&self) {
        self.node.set_text_content(None);
    }

    fn append_frame(&self, spec: &FrameSpec) -> Result<Rc<dyn FrameHandle>, ConfigError> {
        let document = self
            .node
            .owner_document()
            .ok_or_else(|| ConfigError::InvalidMountPoint("node has no owner document".into()))?;
        let element = document
            .create_element("iframe")
            .map_err(mount_error)?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| ConfigError::InvalidMountPoint("created element is not an iframe".into()))?;

        element.set_src(&spec.src);
        element.set_attribute("allow", &spec.allow).map_err(mount_error)?;
        let style = element.style();
        style.set_property("width", &spec.width).map_err(mount_error)?;
        style.set_property("height", &spec.height).map_err(mount_error)?;
        style.set_property("border", &spec.border).map_err(mount_error)?;

        self.node.append_child(&element).map_err(mount_error)?;
        Ok(Rc::new(WebFrame {
            element,
            load_callbacks: RefCell::new(Vec::new()),
        }))
    }
}

/// An `<iframe>` inserted by the host.
pub struct WebFrame {
    element: HtmlIFrameElement,
    load_callbacks: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl WebFrame {
    pub fn element(&self) -> &HtmlIFrameElement {
        &self.element
    }

    fn listen(&self, event: &str, outcome: FrameLoad, listener: FrameLoadListener) {
        let callback: Closure<dyn Fn()> = Closure::new(move || listener(outcome));
        if let Err(e) = self
            .element
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            warn!(event = event, error = ?e, "failed to add frame listener");
            return;
        }
        self.load_callbacks.borrow_mut().push(callback);
    }
}

impl FrameHandle for WebFrame {
    fn content_window(&self) -> Option<Rc<dyn WindowRef>> {
        if !self.is_attached() {
            return None;
        }
        let window = self.element.content_window()?;
        Some(Rc::new(WebWindowRef::new(window)))
    }

    fn is_attached(&self) -> bool {
        self.element.is_connected()
    }

    fn detach(&self) {
        self.element.remove();
    }

    fn add_load_listener(&self, listener: FrameLoadListener) {
        self.listen("load", FrameLoad::Loaded, Rc::clone(&listener));
        self.listen("error", FrameLoad::Failed, listener);
    }
}
