//! Order Reconciler
//!
//! Same discipline as the cart: remote-backed creation returns the remote id
//! and total, the periodic pull replaces the whole history when it differs.
//! Local-only creation computes the charges here and persists the history.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use foodie_client::RemoteGateway;
use shared::models::{DeliveryType, Order};
use shared::money;
use shared::request::CreateOrderRequest;
use shared::util;
use tokio::sync::Mutex;

use super::cart::CartReconciler;
use super::mode::{Mode, ModeController};
use super::store::OrderStore;
use crate::error::{StorefrontError, StorefrontResult};
use crate::events::{EventBus, NoticeLevel, SessionEvent};

/// Orders younger than this (and not finished) are "current"
pub const CURRENT_WINDOW_HOURS: i64 = 2;
/// History shown to the customer
pub const HISTORY_LIMIT: usize = 10;

// ===== Classification =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedOrders {
    /// Newest first
    pub current: Vec<Order>,
    /// Newest first, at most [`HISTORY_LIMIT`]
    pub history: Vec<Order>,
}

/// Partition orders into current and history.
///
/// current: created less than two hours before `now` and not terminal.
/// history: everything else, newest first, capped at ten.
pub fn classify(orders: &[Order], now: DateTime<Utc>) -> ClassifiedOrders {
    let window = Duration::hours(CURRENT_WINDOW_HOURS);
    let (mut current, mut history): (Vec<Order>, Vec<Order>) = orders
        .iter()
        .cloned()
        .partition(|o| now.signed_duration_since(o.created_at) < window && !o.status.is_terminal());

    current.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    history.truncate(HISTORY_LIMIT);

    ClassifiedOrders { current, history }
}

// ===== Reconciler =====

#[derive(Clone)]
pub struct OrderReconciler {
    gateway: Arc<dyn RemoteGateway>,
    mode: ModeController,
    cart: CartReconciler,
    orders: Arc<Mutex<Vec<Order>>>,
    store: OrderStore,
    events: EventBus,
}

impl OrderReconciler {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        mode: ModeController,
        cart: CartReconciler,
        store: OrderStore,
        events: EventBus,
    ) -> Self {
        Self {
            gateway,
            mode,
            cart,
            orders: Arc::new(Mutex::new(Vec::new())),
            store,
            events,
        }
    }

    pub async fn snapshot(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }

    pub async fn classify(&self, now: DateTime<Utc>) -> ClassifiedOrders {
        classify(&self.orders.lock().await, now)
    }

    /// Restore the persisted history (local-only start).
    pub async fn load_local(&self) -> StorefrontResult<usize> {
        let orders = self.store.load()?;
        let count = orders.len();
        self.replace_if_changed(orders).await;
        Ok(count)
    }

    /// Check out the current cart.
    ///
    /// On success the cart is cleared and the order is prepended to the
    /// history.
    pub async fn create_order(
        &self,
        delivery: DeliveryType,
        address: &str,
        phone: &str,
    ) -> StorefrontResult<Order> {
        let order = match self.mode.current() {
            Mode::Remote => self.create_remote(delivery, address, phone).await?,
            Mode::Local => self.create_local(delivery).await?,
        };

        let (min, max) = delivery.eta_minutes();
        tracing::info!(order_id = %order.id, total = %order.total, %delivery, "Order placed");
        self.events.notice(
            NoticeLevel::Info,
            format!("Order {} placed! Estimated delivery: {min}-{max} minutes", order.id),
        );
        Ok(order)
    }

    async fn create_remote(
        &self,
        delivery: DeliveryType,
        address: &str,
        phone: &str,
    ) -> StorefrontResult<Order> {
        let lines = self.cart.snapshot().await.lines().to_vec();
        if lines.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let req = CreateOrderRequest {
            delivery_type: delivery,
            address: address.trim().to_string(),
            phone: phone.trim().to_string(),
        };
        let placed = self.gateway.create_order(&req).await.map_err(|e| {
            let err = StorefrontError::from(e);
            tracing::warn!(error = %err, "Order creation failed");
            self.events
                .notice(NoticeLevel::Error, format!("Failed to place order: {err}"));
            err
        })?;

        let mut order = Order::placed(placed.order_id, Utc::now(), lines, delivery);
        if !money::approx_eq(order.total, placed.total) {
            // 远程总价为准；本地明细对不上时不保留
            tracing::warn!(
                order_id = %order.id,
                local = %order.total,
                remote = %placed.total,
                "Remote total differs from local breakdown"
            );
            order.charges = None;
        }
        order.total = placed.total;

        self.cart.take_lines().await;
        self.prepend(order.clone()).await;
        Ok(order)
    }

    async fn create_local(&self, delivery: DeliveryType) -> StorefrontResult<Order> {
        let lines = self.cart.take_lines().await;
        if lines.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let order = Order::placed(util::local_order_id(), Utc::now(), lines, delivery);
        let history = self.prepend(order.clone()).await;
        if let Err(e) = self.store.save(&history) {
            tracing::error!(error = %e, "Failed to persist order history");
            self.events
                .notice(NoticeLevel::Warning, "Order placed but could not be saved locally");
        }
        Ok(order)
    }

    async fn prepend(&self, order: Order) -> Vec<Order> {
        let history = {
            let mut orders = self.orders.lock().await;
            orders.insert(0, order);
            orders.clone()
        };
        self.events.emit(SessionEvent::OrdersChanged {
            count: history.len(),
        });
        history
    }

    // ===== Sync =====

    /// Periodic pull, remote-backed only. Returns whether the history
    /// changed. Failures are reported but never demote connectivity.
    pub async fn sync_tick(&self) -> StorefrontResult<bool> {
        if self.mode.current() != Mode::Remote {
            return Ok(false);
        }

        let mut orders = self.gateway.fetch_orders().await.map_err(|e| {
            tracing::warn!(error = %e, "Order sync failed");
            StorefrontError::from(e)
        })?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(self.replace_if_changed(orders).await)
    }

    async fn replace_if_changed(&self, orders: Vec<Order>) -> bool {
        let count = orders.len();
        {
            let mut current = self.orders.lock().await;
            if *current == orders {
                return false;
            }
            *current = orders;
        }
        tracing::debug!(count, "Order history replaced");
        self.events.emit(SessionEvent::OrdersChanged { count });
        true
    }
}
