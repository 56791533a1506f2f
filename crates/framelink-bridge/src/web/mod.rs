//! Browser implementation of the platform traits over `web-sys`.
//!
//! Enabled with the `web` feature. Window identity is tracked by object
//! identity (`Object.is`), so the `WindowId` a frame reports for its content
//! window matches the `source` of messages that window posts.

mod dom;
mod frame;
mod window;

#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

use std::rc::Rc;

use framelink_config::EmbedConfig;

use crate::embed::EmbedEnv;
use crate::host::HostEnv;
use crate::platform::{ChildWindow, MessageBus, MountPoint};

pub use dom::{GlobalRoomClient, WebDocument, WebElement};
pub use frame::{WebFrame, WebMountPoint};
pub use window::{millis, WebScheduler, WebWindow, WebWindowRef};

/// Host environment for the current window, mounting into `parent`.
pub fn host_env(window: &Rc<WebWindow>, parent: Option<web_sys::Node>) -> HostEnv {
    HostEnv {
        bus: Rc::clone(window) as Rc<dyn MessageBus>,
        parent_node: parent.map(|node| Rc::new(WebMountPoint::new(node)) as Rc<dyn MountPoint>),
    }
}

/// Embedded-page environment for the current window. `None` without a
/// document.
pub fn embed_env(window: &Rc<WebWindow>, timings: EmbedConfig) -> Option<EmbedEnv> {
    let document = window.raw().document()?;
    Some(EmbedEnv {
        window: Rc::clone(window) as Rc<dyn ChildWindow>,
        bus: Rc::clone(window) as Rc<dyn MessageBus>,
        document: Rc::new(WebDocument::new(document)),
        room: Rc::new(GlobalRoomClient),
        scheduler: Rc::new(WebScheduler::new(window.raw().clone())),
        timings,
    })
}
