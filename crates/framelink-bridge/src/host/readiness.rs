//! Host readiness state and the pre-handshake command queue.

use std::collections::VecDeque;

use crate::envelope::Envelope;

/// Commands issued before the child announced readiness, in issue order.
#[derive(Debug, Default)]
pub struct PendingQueue(VecDeque<Envelope>);

impl PendingQueue {
    pub fn push(&mut self, envelope: Envelope) {
        self.0.push_back(envelope);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for PendingQueue {
    type Item = Envelope;
    type IntoIter = std::collections::vec_deque::IntoIter<Envelope>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Whether the child has completed the handshake. The queue only exists
/// while pending, so nothing can be queued once ready.
#[derive(Debug)]
pub enum Readiness {
    Pending(PendingQueue),
    Ready,
}

impl Default for Readiness {
    fn default() -> Self {
        Readiness::Pending(PendingQueue::default())
    }
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    /// Queue `envelope` if still pending. Hands it back when already ready.
    pub fn enqueue(&mut self, envelope: Envelope) -> Option<Envelope> {
        match self {
            Readiness::Pending(queue) => {
                queue.push(envelope);
                None
            }
            Readiness::Ready => Some(envelope),
        }
    }

    /// Transition to `Ready`. Returns the queue on the first call only.
    pub fn mark_ready(&mut self) -> Option<PendingQueue> {
        match std::mem::replace(self, Readiness::Ready) {
            Readiness::Pending(queue) => Some(queue),
            Readiness::Ready => None,
        }
    }

    pub fn pending_len(&self) -> usize {
        match self {
            Readiness::Pending(queue) => queue.len(),
            Readiness::Ready => 0,
        }
    }
}
