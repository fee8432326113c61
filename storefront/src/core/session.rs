//! Session context
//!
//! Owns every piece of mutable state (connectivity, menu, cart, orders) and
//! the four scheduled tasks that keep it in sync. All tasks share one
//! cancellation token and are torn down together by [`Session::shutdown`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use foodie_client::RemoteGateway;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::cart::CartReconciler;
use super::catalog::Catalog;
use super::connection_monitor::ConnectionMonitor;
use super::connectivity::Connectivity;
use super::mode::{Mode, ModeController};
use super::orders::OrderReconciler;
use super::store::OrderStore;
use crate::config::StorefrontConfig;
use crate::error::StorefrontResult;
use crate::events::{EventBus, NoticeLevel};

pub struct Session {
    config: StorefrontConfig,
    events: EventBus,
    mode: ModeController,
    catalog: Catalog,
    cart: CartReconciler,
    orders: OrderReconciler,
    shutdown_token: CancellationToken,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl Session {
    /// Build the session context, run the initial probe and load, then
    /// start the scheduled tasks.
    pub async fn start(
        config: StorefrontConfig,
        gateway: Arc<dyn RemoteGateway>,
    ) -> StorefrontResult<Self> {
        config.validate()?;

        let events = EventBus::new();
        let connectivity = Connectivity::new(events.clone());
        let mode = ModeController::new(connectivity.clone(), config.offline_only);
        let catalog = Catalog::new(gateway.clone(), mode.clone(), events.clone());
        let cart = CartReconciler::new(gateway.clone(), mode.clone(), catalog.clone(), events.clone());
        let orders = OrderReconciler::new(
            gateway.clone(),
            mode.clone(),
            cart.clone(),
            OrderStore::new(config.orders_path()),
            events.clone(),
        );
        let monitor = ConnectionMonitor::new(gateway, connectivity, config.probe_interval());

        // 1. Initial probe
        if config.offline_only {
            tracing::info!("Offline-only mode, remote service disabled");
        } else {
            monitor.probe_once().await;
        }

        // 2. Initial load
        catalog.load().await;
        match mode.current() {
            Mode::Remote => {
                if let Err(e) = cart.sync_tick().await {
                    tracing::warn!(error = %e, "Initial cart pull failed");
                }
                if let Err(e) = orders.sync_tick().await {
                    tracing::warn!(error = %e, "Initial order pull failed");
                }
            }
            Mode::Local => match orders.load_local().await {
                Ok(count) => tracing::info!(count, "Order history restored from local store"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to restore order history");
                    events.notice(NoticeLevel::Warning, "Saved order history could not be read");
                }
            },
        }

        let shutdown_token = CancellationToken::new();
        let mut tasks = Vec::with_capacity(4);

        // 3. Scheduled tasks
        if !config.offline_only {
            tasks.push((
                "connection-monitor",
                tokio::spawn(monitor.run(shutdown_token.child_token())),
            ));

            let c = cart.clone();
            tasks.push((
                "cart-sync",
                spawn_periodic(config.cart_sync_interval(), shutdown_token.child_token(), move || {
                    let c = c.clone();
                    async move {
                        let _ = c.sync_tick().await;
                    }
                }),
            ));

            let o = orders.clone();
            tasks.push((
                "order-sync",
                spawn_periodic(config.order_sync_interval(), shutdown_token.child_token(), move || {
                    let o = o.clone();
                    async move {
                        let _ = o.sync_tick().await;
                    }
                }),
            ));

            let m = catalog.clone();
            tasks.push((
                "menu-refresh",
                spawn_periodic(config.menu_refresh_interval(), shutdown_token.child_token(), move || {
                    let m = m.clone();
                    async move {
                        let _ = m.refresh_tick().await;
                    }
                }),
            ));
        }

        tracing::info!(
            mode = ?mode.current(),
            tasks = tasks.len(),
            customer_id = %config.customer_id,
            "Storefront session started"
        );

        Ok(Self {
            config,
            events,
            mode,
            catalog,
            cart,
            orders,
            shutdown_token,
            tasks,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn connectivity(&self) -> &Connectivity {
        self.mode.connectivity()
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartReconciler {
        &self.cart
    }

    pub fn orders(&self) -> &OrderReconciler {
        &self.orders
    }

    /// Cancel the scheduled tasks and wait for them, aborting whatever is
    /// still running once the shutdown timeout expires.
    pub async fn shutdown(self) {
        self.shutdown_token.cancel();
        let timeout = self.config.shutdown_timeout();
        let abort_handles: Vec<_> = self
            .tasks
            .iter()
            .map(|(name, t)| (*name, t.abort_handle()))
            .collect();

        let joined = tokio::time::timeout(timeout, async {
            for (name, task) in self.tasks {
                match task.await {
                    Ok(()) => tracing::debug!(task = name, "Task completed gracefully"),
                    Err(e) if e.is_cancelled() => tracing::debug!(task = name, "Task cancelled"),
                    Err(e) => tracing::error!(task = name, "Task panicked: {}", e),
                }
            }
        })
        .await;

        if joined.is_err() {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Session shutdown timed out, aborting remaining tasks"
            );
            for (name, handle) in abort_handles {
                if !handle.is_finished() {
                    tracing::debug!(task = name, "Aborting task");
                    handle.abort();
                }
            }
        }
        tracing::info!("Storefront session stopped");
    }
}

/// Run `tick` every `period` (first run after one period) until cancelled.
fn spawn_periodic<F, Fut>(period: Duration, shutdown: CancellationToken, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => tick().await,
            }
        }
    })
}
