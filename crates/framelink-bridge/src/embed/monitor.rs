//! Edge detection for the embed side's polled state.

use framelink_common::TimerId;

/// Last observed screen-share state. Only changes are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenShareGate {
    last: bool,
}

impl ScreenShareGate {
    /// Record an observation. Returns the new state when it differs from the
    /// previous one.
    pub fn observe(&mut self, active: bool) -> Option<bool> {
        if active == self.last {
            return None;
        }
        self.last = active;
        Some(active)
    }

    pub fn last(&self) -> bool {
        self.last
    }
}

/// Progress of the join poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinState {
    #[default]
    Idle,
    Polling(TimerId),
    Joined,
}

impl JoinState {
    /// The room reported connected. Returns the poller to cancel the first
    /// time only.
    pub fn connected(&mut self) -> Option<TimerId> {
        match *self {
            JoinState::Polling(timer) => {
                *self = JoinState::Joined;
                Some(timer)
            }
            JoinState::Idle | JoinState::Joined => None,
        }
    }

    /// Abandon polling. Returns the poller to cancel, if any.
    pub fn stop(&mut self) -> Option<TimerId> {
        match *self {
            JoinState::Polling(timer) => {
                *self = JoinState::Idle;
                Some(timer)
            }
            JoinState::Idle | JoinState::Joined => None,
        }
    }

    pub fn has_joined(&self) -> bool {
        matches!(self, JoinState::Joined)
    }
}
