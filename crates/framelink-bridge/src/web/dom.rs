use std::rc::Rc;

use js_sys::{Function, Reflect};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use crate::platform::{ClickListener, Document, Element, RoomClient};

pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl Document for WebDocument {
    fn element_by_id(&self, id: &str) -> Option<Rc<dyn Element>> {
        let element = self
            .document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Rc::new(WebElement { element }))
    }
}

/// A toolbar control in the embedded page.
pub struct WebElement {
    element: HtmlElement,
}

impl Element for WebElement {
    fn is_disabled(&self) -> bool {
        self.element.has_attribute("disabled")
    }

    fn click(&self) {
        self.element.click();
    }

    /// The listener lives as long as the page.
    fn add_click_listener(&self, listener: ClickListener) {
        let callback: Closure<dyn Fn()> = Closure::new(move || listener());
        if let Err(e) = self
            .element
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        {
            warn!(id = %self.element.id(), error = ?e, "failed to add click listener");
            return;
        }
        callback.forget();
    }
}

/// The page's global `RoomClientInterface` object.
pub struct GlobalRoomClient;

impl GlobalRoomClient {
    const GLOBAL: &'static str = "RoomClientInterface";

    fn call(&self, method: &str) -> Option<JsValue> {
        let target = Reflect::get(&js_sys::global(), &JsValue::from_str(Self::GLOBAL)).ok()?;
        if target.is_undefined() || target.is_null() {
            return None;
        }
        let function = Reflect::get(&target, &JsValue::from_str(method))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        match function.call0(&target) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(method = method, error = ?e, "room client call failed");
                None
            }
        }
    }

    fn flag(&self, method: &str) -> Option<bool> {
        self.call(method).and_then(|value| value.as_bool())
    }
}

impl RoomClient for GlobalRoomClient {
    fn is_connected(&self) -> bool {
        self.flag("isConnected").unwrap_or(false)
    }

    fn is_screen_shared(&self) -> bool {
        self.flag("isScreenShared").unwrap_or(false)
    }

    fn leave_room(&self) {
        if self.call("leaveRoom").is_none() {
            warn!("room client unavailable, leave not performed");
        }
    }
}
