use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use framelink_common::{new_correlation_id, ConfigError};
use framelink_config::validation::is_valid_domain;
use framelink_config::{EmbedOptions, HostConfig};
use tracing::{debug, info, warn};

use crate::origin::OriginLock;
use crate::platform::{FrameLoad, FrameSpec, MessageEvent, MessageListener, MountPoint};
use crate::registry::ListenerRegistry;

use super::params::{child_origin, frame_url, normalized_domain, FRAME_ALLOW};
use super::readiness::Readiness;
use super::{HostBridge, HostEnv, HostInner};

impl HostBridge {
    /// Embed the client served from `domain` (over https, at `/join`).
    ///
    /// Fails when `domain` is empty or `env.parent_node` is missing or not
    /// an attachable element.
    pub fn create(domain: &str, options: EmbedOptions, env: HostEnv) -> Result<Self, ConfigError> {
        let config = HostConfig {
            domain: domain.to_string(),
            options,
            ..Default::default()
        };
        Self::with_config(&config, env)
    }

    /// Embed the client described by a full host config.
    pub fn with_config(config: &HostConfig, env: HostEnv) -> Result<Self, ConfigError> {
        let domain = normalized_domain(&config.domain);
        if domain.is_empty() {
            return Err(ConfigError::InvalidTarget("domain is required".into()));
        }
        if !is_valid_domain(&domain) {
            return Err(ConfigError::InvalidTarget(format!(
                "'{}' is not a host name with optional port",
                config.domain
            )));
        }
        if config.options.room.trim().is_empty() {
            return Err(ConfigError::ValidationError("room is required".into()));
        }
        let parent = validated_parent(env.parent_node.as_ref())?;

        let spec = FrameSpec {
            src: frame_url(config),
            allow: FRAME_ALLOW.to_string(),
            width: config.options.width.clone(),
            height: config.options.height.clone(),
            border: "0px".to_string(),
        };

        parent.clear();
        let frame = parent.append_frame(&spec)?;

        let inner = Rc::new(HostInner {
            instance: new_correlation_id(),
            child_origin: child_origin(config),
            frame_url: spec.src,
            bus: Rc::clone(&env.bus),
            frame: RefCell::new(Some(Rc::clone(&frame))),
            frame_load: Cell::new(None),
            listener: Cell::new(None),
            readiness: RefCell::new(Readiness::default()),
            origin: RefCell::new(OriginLock::default()),
            listeners: RefCell::new(ListenerRegistry::new()),
        });

        let weak: Weak<HostInner> = Rc::downgrade(&inner);
        let listener: MessageListener = Rc::new(move |event: &MessageEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_message(event);
            }
        });
        inner.listener.set(Some(env.bus.add_message_listener(listener)));

        let weak = Rc::downgrade(&inner);
        frame.add_load_listener(Rc::new(move |outcome: FrameLoad| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame_load(outcome);
            }
        }));

        info!(
            instance = %inner.instance,
            url = %inner.frame_url,
            "embedded frame mounted"
        );
        Ok(Self { inner })
    }

    /// Stop listening, remove the frame, and drop all handlers. Safe to call
    /// more than once.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if let Some(id) = inner.listener.take() {
            inner.bus.remove_message_listener(id);
        }
        let frame = inner.frame.borrow_mut().take();
        if let Some(frame) = frame {
            frame.detach();
            debug!(instance = %inner.instance, "embedded frame detached");
        }
        inner.listeners.borrow_mut().clear();
    }
}

impl HostInner {
    fn on_frame_load(&self, outcome: FrameLoad) {
        self.frame_load.set(Some(outcome));
        match outcome {
            FrameLoad::Loaded => {
                debug!(instance = %self.instance, url = %self.frame_url, "embedded frame loaded")
            }
            FrameLoad::Failed => {
                warn!(instance = %self.instance, url = %self.frame_url, "embedded frame failed to load")
            }
        }
    }
}

fn validated_parent(
    parent: Option<&Rc<dyn MountPoint>>,
) -> Result<&Rc<dyn MountPoint>, ConfigError> {
    let parent = parent
        .ok_or_else(|| ConfigError::InvalidMountPoint("parent node is required".into()))?;
    if !parent.is_attachable() {
        return Err(ConfigError::InvalidMountPoint(
            "parent node is not an attachable element".into(),
        ));
    }
    Ok(parent)
}
