use std::path::PathBuf;

use crate::id::WindowId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid parent node: {0}")]
    InvalidMountPoint(String),
}

/// Failure to hand an envelope to the counterpart window.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("target window {0} is closed")]
    WindowClosed(WindowId),

    #[error("embedded frame is detached")]
    FrameDetached,

    #[error("envelope serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("post rejected: {0}")]
    Rejected(String),
}

/// Error returned by an event handler. Logged by the dispatcher, never
/// propagated to the sender of the event.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self(format!("payload error: {err}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("host.options.room is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: host.options.room is empty"
        );

        let err = ConfigError::InvalidTarget("domain is required".into());
        assert_eq!(err.to_string(), "invalid target: domain is required");

        let err = ConfigError::InvalidMountPoint("not attachable".into());
        assert_eq!(err.to_string(), "invalid parent node: not attachable");
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::WindowClosed(WindowId(4));
        assert_eq!(err.to_string(), "target window window#4 is closed");

        let err = TransportError::FrameDetached;
        assert_eq!(err.to_string(), "embedded frame is detached");

        let err = TransportError::Rejected("DataCloneError".into());
        assert_eq!(err.to_string(), "post rejected: DataCloneError");
    }

    #[test]
    fn handler_error_conversions() {
        let err: HandlerError = "boom".into();
        assert_eq!(err.message(), "boom");

        let err: HandlerError = String::from("bang").into();
        assert_eq!(err.to_string(), "bang");

        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: HandlerError = json_err.into();
        assert!(err.message().starts_with("payload error:"));
    }

    #[test]
    fn bridge_error_from_config() {
        let bridge_err: BridgeError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(bridge_err, BridgeError::Config(_)));
        assert!(bridge_err.to_string().contains("bad toml"));
    }

    #[test]
    fn bridge_error_from_transport() {
        let bridge_err: BridgeError = TransportError::FrameDetached.into();
        assert!(matches!(bridge_err, BridgeError::Transport(_)));
        assert_eq!(bridge_err.to_string(), "embedded frame is detached");
    }

    #[test]
    fn bridge_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let bridge_err: BridgeError = io_err.into();
        assert!(matches!(bridge_err, BridgeError::Io(_)));
        assert!(bridge_err.to_string().contains("file missing"));
    }

    #[test]
    fn bridge_error_other_and_handler() {
        let err = BridgeError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");

        let err: BridgeError = HandlerError::new("listener failed").into();
        assert_eq!(err.to_string(), "handler error: listener failed");
    }
}
