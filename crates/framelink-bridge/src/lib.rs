//! Cross-window bridge between a host page and an embedded conferencing
//! client.
//!
//! Provides:
//! - `HostBridge`: mounts the client frame, queues commands until the
//!   client is ready, and dispatches child events to handlers
//! - `EmbedBridge`: runs inside the frame, maps host commands onto the
//!   client's UI, and reports toolbar, join, and screen-share events
//! - The shared wire envelope and its validation
//! - Platform traits for the browser primitives both sides sit on
//! - `sim`: an in-memory browser implementing those traits
//! - `web` (feature `web`): the same traits over `web-sys`

pub mod commands;
pub mod embed;
pub mod envelope;
pub mod host;
pub mod origin;
pub mod platform;
pub mod registry;
pub mod sim;
#[cfg(feature = "web")]
pub mod web;


pub use commands::Command;
pub use embed::{EmbedBridge, EmbedEnv, Phase};
pub use envelope::{Action, Envelope, Rejection, Scope};
pub use host::{HostBridge, HostEnv};
pub use origin::OriginLock;
pub use platform::FrameLoad;
pub use registry::{Handler, HandlerResult, ListenerRegistry};
