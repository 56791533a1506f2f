pub mod errors;
pub mod id;

pub use errors::{BridgeError, ConfigError, HandlerError, TransportError};
pub use id::{new_correlation_id, ListenerId, TimerId, WindowId};

pub type Result<T> = std::result::Result<T, BridgeError>;
