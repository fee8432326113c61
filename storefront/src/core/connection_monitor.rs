//! Connection Monitor - 连接状态监控
//!
//! 定期用一次轻量读 (GET /menu) 探测远程服务。
//! 探测失败 -> DISCONNECTED，探测成功 -> CONNECTED；状态不变时不发事件。

use std::sync::Arc;
use std::time::Duration;

use foodie_client::RemoteGateway;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::connectivity::Connectivity;

/// 连接监控器
pub struct ConnectionMonitor {
    gateway: Arc<dyn RemoteGateway>,
    connectivity: Connectivity,
    check_interval: Duration,
}

impl ConnectionMonitor {
    /// 创建新的连接监控器
    ///
    /// # Arguments
    /// * `gateway` - 远程服务网关
    /// * `connectivity` - 共享连接状态
    /// * `check_interval` - 检查间隔时间
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        connectivity: Connectivity,
        check_interval: Duration,
    ) -> Self {
        Self {
            gateway,
            connectivity,
            check_interval,
        }
    }

    /// 执行一次探测，返回探测后的连接状态
    pub async fn probe_once(&self) -> bool {
        let reachable = match self.gateway.probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Probe failed");
                false
            }
        };
        self.connectivity.set_connected(reachable);
        reachable
    }

    /// 启动监控循环，直到 `shutdown` 被取消
    ///
    /// 第一次探测在一个间隔之后 (启动时 Session 已经探测过一次)。
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.check_interval, self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(interval_ms = self.check_interval.as_millis() as u64, "Connection monitor started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.probe_once().await;
                }
            }
        }
        tracing::debug!("Connection monitor stopped");
    }
}
