//! Session events
//!
//! Presentation subscribes to a broadcast channel instead of being called
//! back directly. Emitting never blocks; a lagging subscriber loses the
//! oldest events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Emitted once per CONNECTED <-> DISCONNECTED transition
    ConnectivityChanged { connected: bool },
    CartChanged { item_count: u32, subtotal: Decimal },
    OrdersChanged { count: usize },
    MenuChanged { count: usize },
    /// Non-blocking user-visible message
    Notice { level: NoticeLevel, message: String },
}

/// Cloneable handle to the session's event channel
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        // 没有订阅者时 send 返回 Err，忽略即可
        let _ = self.tx.send(event);
    }

    pub fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.emit(SessionEvent::Notice {
            level,
            message: message.into(),
        });
    }
}
