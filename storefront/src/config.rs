//! Storefront configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use foodie_client::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::StorefrontError;
use crate::logging::LogSettings;

/// 应用配置
///
/// Stored as pretty JSON. Missing fields fall back to their defaults so an
/// older file keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// 远程服务地址
    pub base_url: String,
    /// 每个请求附带的 customerId
    pub customer_id: String,
    pub request_timeout_secs: u64,
    /// 连接探测间隔
    pub probe_interval_ms: u64,
    pub cart_sync_interval_ms: u64,
    pub order_sync_interval_ms: u64,
    pub menu_refresh_interval_ms: u64,
    /// 数据目录 (离线订单历史、日志)
    pub data_dir: PathBuf,
    /// Never talk to the remote service
    pub offline_only: bool,
    /// 关闭时等待后台任务的最长时间
    pub shutdown_timeout_ms: u64,
    pub logging: LogSettings,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            customer_id: "cli-customer-1".to_string(),
            request_timeout_secs: 30,
            probe_interval_ms: 10_000,
            cart_sync_interval_ms: 5_000,
            order_sync_interval_ms: 10_000,
            menu_refresh_interval_ms: 10_000,
            data_dir: PathBuf::from("./data"),
            offline_only: false,
            shutdown_timeout_ms: 5_000,
            logging: LogSettings::default(),
        }
    }
}

impl StorefrontConfig {
    /// 从文件加载配置
    pub fn load(path: &Path) -> Result<Self, StorefrontError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self =
                serde_json::from_str(&content).map_err(|e| StorefrontError::Config(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: &Path) -> Result<(), StorefrontError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| StorefrontError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Zero intervals would spin the scheduled tasks.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        let intervals = [
            ("probe_interval_ms", self.probe_interval_ms),
            ("cart_sync_interval_ms", self.cart_sync_interval_ms),
            ("order_sync_interval_ms", self.order_sync_interval_ms),
            ("menu_refresh_interval_ms", self.menu_refresh_interval_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, v)| *v == 0) {
            return Err(StorefrontError::Config(format!("{name} must be > 0")));
        }
        if self.base_url.trim().is_empty() {
            return Err(StorefrontError::Config("base_url is empty".into()));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
            .with_customer_id(self.customer_id.clone())
            .with_timeout(self.request_timeout_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn cart_sync_interval(&self) -> Duration {
        Duration::from_millis(self.cart_sync_interval_ms)
    }

    pub fn order_sync_interval(&self) -> Duration {
        Duration::from_millis(self.order_sync_interval_ms)
    }

    pub fn menu_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.menu_refresh_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 离线订单历史文件
    pub fn orders_path(&self) -> PathBuf {
        self.data_dir.join("foodieExpressOrders.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.cart_sync_interval(), Duration::from_secs(5));
        assert_eq!(config.probe_interval(), Duration::from_secs(10));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("storefront.json");
        let config = StorefrontConfig {
            customer_id: "web-7".into(),
            offline_only: true,
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(StorefrontConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        std::fs::write(&path, r#"{"customer_id":"kiosk-2"}"#).unwrap();
        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.customer_id, "kiosk-2");
        assert_eq!(config.order_sync_interval_ms, 10_000);
    }

    #[test]
    fn logging_section_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.json");
        std::fs::write(
            &path,
            r#"{"logging":{"level":"storefront=trace","file_format":"json"}}"#,
        )
        .unwrap();
        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("storefront=trace"));
        assert_eq!(config.logging.file_format, crate::logging::LogFormat::Json);
        assert!(config.logging.to_file);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = StorefrontConfig {
            cart_sync_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(StorefrontError::Config(_))));
    }

    #[test]
    fn client_config_carries_identity() {
        let config = StorefrontConfig {
            customer_id: "web-7".into(),
            request_timeout_secs: 3,
            ..Default::default()
        };
        let client = config.client_config();
        assert_eq!(client.customer_id, "web-7");
        assert_eq!(client.timeout, 3);
    }
}
