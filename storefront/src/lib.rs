//! Foodie Express storefront core
//!
//! 购物车 / 订单同步核心：
//! - 在线: 所有变更发往远程服务，随后整体重新拉取 (远程为准)
//! - 离线: 在本地副本上直接修改，订单历史持久化到本地文件
//!
//! 连接状态由 [`core::ConnectionMonitor`] 维护，每次操作前由
//! [`core::ModeController`] 重新决定走哪条路径。

pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod logging;

pub use config::StorefrontConfig;
pub use core::Session;
pub use error::{StorefrontError, StorefrontResult};
pub use events::{EventBus, NoticeLevel, SessionEvent};

// Re-export for binaries and tests
pub use foodie_client;
pub use shared;
