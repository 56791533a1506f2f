//! Deterministic in-memory browser.
//!
//! `SimBrowser` implements the platform traits without a real page: windows
//! exchange messages through a FIFO task queue, timers run on a virtual
//! clock, and DOM elements and the room client are plain cells. Nothing runs
//! until the caller drives the browser with [`SimBrowser::run_until_idle`]
//! or [`SimBrowser::advance`], which makes asynchronous delivery observable.

mod browser;
mod dom;
mod frame;

pub use browser::{SimBrowser, SimWindow, SimWindowRef};
pub use dom::{SimDocument, SimElement, SimRoom};
pub use frame::{origin_of, SimFrame, SimMountPoint};
