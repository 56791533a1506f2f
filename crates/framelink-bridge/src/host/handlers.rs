use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::envelope::{events, handshake, Action, Envelope, Scope};
use crate::platform::MessageEvent;

use super::HostInner;

impl HostInner {
    /// Entry point for every `message` event on the host window.
    pub(super) fn handle_message(&self, event: &MessageEvent) {
        let envelope = match Envelope::parse(&event.data) {
            Ok(envelope) => envelope,
            Err(rejection) => {
                trace!(instance = %self.instance, %rejection, "ignoring message");
                return;
            }
        };

        if event.source.is_none() || event.source != self.frame_window() {
            trace!(
                instance = %self.instance,
                name = %envelope.name,
                "ignoring message from a window other than the frame"
            );
            return;
        }
        if event.origin != self.child_origin || !self.origin.borrow_mut().admit(&event.origin) {
            trace!(
                instance = %self.instance,
                origin = %event.origin,
                "ignoring message from unexpected origin"
            );
            return;
        }

        match envelope.action {
            Action::Handshake if envelope.name == handshake::READY => self.on_child_ready(),
            Action::Event => self.emit(&envelope.name, &envelope.payload),
            _ => trace!(
                instance = %self.instance,
                action = ?envelope.action,
                name = %envelope.name,
                "ignoring unexpected envelope"
            ),
        }
    }

    fn on_child_ready(&self) {
        self.post(&Envelope::handshake(Scope::Parent, handshake::ACK));

        let flushed = self.readiness.borrow_mut().mark_ready();
        let Some(queue) = flushed else {
            debug!(instance = %self.instance, "duplicate ready, acknowledged again");
            return;
        };

        debug!(
            instance = %self.instance,
            queued = queue.len(),
            "child ready, flushing queued commands"
        );
        for envelope in queue {
            self.post(&envelope);
        }
        self.emit(events::READY, &Value::Null);
    }

    /// Invoke persistent handlers, then one-shot handlers, for `event`.
    ///
    /// Handlers are snapshotted first, so they may register, remove, or send
    /// through the bridge while running.
    pub(super) fn emit(&self, event: &str, payload: &Value) {
        let (handlers, once) = {
            let mut listeners = self.listeners.borrow_mut();
            (listeners.handlers(event), listeners.take_once(event))
        };
        for handler in handlers.iter().chain(once.iter()) {
            if let Err(e) = handler.call(payload) {
                warn!(instance = %self.instance, event, error = %e, "event handler failed");
            }
        }
    }
}
