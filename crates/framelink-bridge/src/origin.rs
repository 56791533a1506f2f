//! Counterpart origin pinning.

use crate::envelope::WILDCARD_ORIGIN;

/// The counterpart origin this side talks to.
///
/// Starts `Unset` and is pinned by the first legitimate message. There is no
/// way back to `Unset`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OriginLock {
    #[default]
    Unset,
    Locked(String),
}

impl OriginLock {
    /// Check `origin` against the lock, pinning it when still unset.
    pub fn admit(&mut self, origin: &str) -> bool {
        match self {
            OriginLock::Unset => {
                *self = OriginLock::Locked(origin.to_string());
                true
            }
            OriginLock::Locked(locked) => locked == origin,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, OriginLock::Locked(_))
    }

    pub fn locked_origin(&self) -> Option<&str> {
        match self {
            OriginLock::Unset => None,
            OriginLock::Locked(origin) => Some(origin),
        }
    }

    /// Target origin for outbound posts: the pinned origin, or `*`.
    pub fn target(&self) -> &str {
        self.locked_origin().unwrap_or(WILDCARD_ORIGIN)
    }
}
