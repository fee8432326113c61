//! OrderStore - 离线订单历史
//!
//! 订单历史以 JSON 数组保存在 `<data_dir>/foodieExpressOrders.json`。
//! 只在 local-only 模式下读写；在线时订单历史以远程为准。

use std::path::{Path, PathBuf};

use shared::models::Order;

use crate::error::{StorefrontError, StorefrontResult};

#[derive(Debug, Clone)]
pub struct OrderStore {
    path: PathBuf,
}

impl OrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means no history yet.
    pub fn load(&self) -> StorefrontResult<Vec<Order>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            StorefrontError::Store(format!("{}: {e}", self.path.display()))
        })
    }

    /// Write to a sibling temp file, then rename over the target.
    pub fn save(&self, orders: &[Order]) -> StorefrontResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(orders)
            .map_err(|e| StorefrontError::Store(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(count = orders.len(), path = %self.path.display(), "Order history saved");
        Ok(())
    }
}
