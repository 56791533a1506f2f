//! The page's single embed bridge.
//!
//! A framed page runs one bridge for its lifetime. It lives in thread-local
//! state because the page, its timers, and its message listeners all belong
//! to the browser's main thread.

use std::cell::RefCell;

use tracing::debug;

use super::{EmbedBridge, EmbedEnv};

thread_local! {
    static INSTALLED: RefCell<Option<EmbedBridge>> = const { RefCell::new(None) };
}

/// Start the page's embed bridge. If one is already installed it is
/// returned unchanged and `env` is dropped.
pub fn install(env: EmbedEnv) -> EmbedBridge {
    if let Some(existing) = installed() {
        debug!("embed bridge already installed");
        return existing;
    }
    let bridge = EmbedBridge::start(env);
    INSTALLED.with(|slot| *slot.borrow_mut() = Some(bridge.clone()));
    bridge
}

/// The installed bridge, if any.
pub fn installed() -> Option<EmbedBridge> {
    INSTALLED.with(|slot| slot.borrow().clone())
}

/// Shut down and forget the installed bridge. Returns `false` when nothing
/// was installed.
pub fn teardown() -> bool {
    let previous = INSTALLED.with(|slot| slot.borrow_mut().take());
    match previous {
        Some(bridge) => {
            bridge.shutdown();
            true
        }
        None => false,
    }
}
