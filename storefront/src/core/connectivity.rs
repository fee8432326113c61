//! Process-wide connectivity state
//!
//! Starts DISCONNECTED. Writers are crate-private: only the connection
//! monitor (both directions) and the cart sync tick (demotion) flip it.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::events::{EventBus, NoticeLevel, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    pub connected: bool,
    pub last_transition_at: DateTime<Utc>,
}

impl ConnectivityState {
    fn initial() -> Self {
        Self {
            connected: false,
            last_transition_at: Utc::now(),
        }
    }
}

/// Shared handle; clones observe the same state.
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: watch::Sender<ConnectivityState>,
    events: EventBus,
}

impl Connectivity {
    pub fn new(events: EventBus) -> Self {
        let (tx, _) = watch::channel(ConnectivityState::initial());
        Self { tx, events }
    }

    pub fn state(&self) -> ConnectivityState {
        *self.tx.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.tx.borrow().connected
    }

    /// Observe transitions (e.g. to wait for the first successful probe).
    pub fn watch(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }

    /// Apply a probe outcome. Returns `true` when the state flipped.
    ///
    /// One `ConnectivityChanged` per transition; repeating the current state
    /// emits nothing.
    pub(crate) fn set_connected(&self, connected: bool) -> bool {
        let flipped = self.tx.send_if_modified(|state| {
            if state.connected == connected {
                return false;
            }
            state.connected = connected;
            state.last_transition_at = Utc::now();
            true
        });

        if flipped {
            if connected {
                tracing::info!("Remote service reachable, switching to remote-backed mode");
                self.events
                    .notice(NoticeLevel::Info, "Connected to server - live sync enabled");
            } else {
                tracing::warn!("Remote service unreachable, falling back to local-only mode");
                self.events
                    .notice(NoticeLevel::Warning, "Server connection lost - working offline");
            }
            self.events.emit(SessionEvent::ConnectivityChanged { connected });
        }
        flipped
    }

    pub(crate) fn demote(&self) -> bool {
        self.set_connected(false)
    }
}
