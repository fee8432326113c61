//! Mode Controller
//!
//! Picks remote-backed or local-only for the next operation. Callers ask
//! again before every operation; the answer is never cached.

use super::connectivity::{Connectivity, ConnectivityState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Delegate to the remote service, then re-pull
    Remote,
    /// Mutate the local replica
    Local,
}

/// Pure decision function.
pub fn select(state: &ConnectivityState, offline_only: bool) -> Mode {
    if state.connected && !offline_only {
        Mode::Remote
    } else {
        Mode::Local
    }
}

#[derive(Debug, Clone)]
pub struct ModeController {
    connectivity: Connectivity,
    offline_only: bool,
}

impl ModeController {
    pub fn new(connectivity: Connectivity, offline_only: bool) -> Self {
        Self {
            connectivity,
            offline_only,
        }
    }

    pub fn current(&self) -> Mode {
        select(&self.connectivity.state(), self.offline_only)
    }

    pub fn offline_only(&self) -> bool {
        self.offline_only
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use chrono::Utc;

    fn state(connected: bool) -> ConnectivityState {
        ConnectivityState {
            connected,
            last_transition_at: Utc::now(),
        }
    }

    #[test]
    fn decision_table() {
        assert_eq!(select(&state(true), false), Mode::Remote);
        assert_eq!(select(&state(false), false), Mode::Local);
        assert_eq!(select(&state(true), true), Mode::Local);
        assert_eq!(select(&state(false), true), Mode::Local);
    }

    #[test]
    fn follows_connectivity_changes() {
        let connectivity = Connectivity::new(EventBus::new());
        let mode = ModeController::new(connectivity.clone(), false);
        assert_eq!(mode.current(), Mode::Local);
        connectivity.set_connected(true);
        assert_eq!(mode.current(), Mode::Remote);
        connectivity.demote();
        assert_eq!(mode.current(), Mode::Local);
    }
}
