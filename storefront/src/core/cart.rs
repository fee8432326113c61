//! Cart Reconciler
//!
//! Owns the local cart replica.
//!
//! - Remote-backed: send the mutation, then replace the whole replica with a
//!   fresh pull. Nothing is merged locally.
//! - Local-only: mutate the replica in place.
//!
//! The lock is never held across a remote call; state read before an await
//! may be stale afterwards, which is why every successful remote mutation
//! ends in a wholesale replace.

use std::sync::Arc;

use foodie_client::RemoteGateway;
use rust_decimal::Decimal;
use shared::models::{Cart, CartLine};
use shared::models::cart::normalize_instructions;
use shared::request::{AddCartItemRequest, UpdateCartItemRequest};
use shared::util;
use tokio::sync::Mutex;

use super::catalog::Catalog;
use super::connectivity::Connectivity;
use super::custom::CustomItemBuilder;
use super::mode::{Mode, ModeController};
use crate::error::{StorefrontError, StorefrontResult};
use crate::events::{EventBus, NoticeLevel, SessionEvent};

#[derive(Clone)]
pub struct CartReconciler {
    gateway: Arc<dyn RemoteGateway>,
    mode: ModeController,
    catalog: Catalog,
    cart: Arc<Mutex<Cart>>,
    events: EventBus,
}

impl CartReconciler {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        mode: ModeController,
        catalog: Catalog,
        events: EventBus,
    ) -> Self {
        Self {
            gateway,
            mode,
            catalog,
            cart: Arc::new(Mutex::new(Cart::new())),
            events,
        }
    }

    fn connectivity(&self) -> &Connectivity {
        self.mode.connectivity()
    }

    // ===== Queries =====

    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    pub async fn item_count(&self) -> u32 {
        self.cart.lock().await.item_count()
    }

    pub async fn subtotal(&self) -> Decimal {
        self.cart.lock().await.subtotal()
    }

    // ===== Mutations =====

    /// Add `quantity` units of a menu item. Zero quantity is a no-op.
    pub async fn add_item(
        &self,
        item_id: i64,
        quantity: u32,
        instructions: Option<String>,
    ) -> StorefrontResult<()> {
        if quantity == 0 {
            return Ok(());
        }

        match self.mode.current() {
            Mode::Remote => {
                let req = AddCartItemRequest {
                    item_id,
                    quantity,
                    instructions: normalize_instructions(instructions).unwrap_or_default(),
                };
                self.gateway
                    .add_to_cart(&req)
                    .await
                    .map_err(|e| self.report("add item to cart", e.into()))?;
                tracing::debug!(item_id, quantity, "Item added remotely");
                self.pull().await;
            }
            Mode::Local => {
                let item = self
                    .catalog
                    .find(item_id)
                    .await
                    .ok_or(StorefrontError::UnknownMenuItem(item_id))?;
                let line = CartLine::from_menu_item(&item, quantity, instructions);
                self.mutate_local(|cart| {
                    cart.add(line);
                    true
                })
                .await;
                tracing::debug!(item_id, quantity, "Item added locally");
            }
        }
        Ok(())
    }

    /// Add a build-your-own item. Only the local replica can hold custom
    /// lines, so this fails while remote-backed and posts an info notice
    /// telling the shopper where the builder works.
    pub async fn add_custom(&self, builder: &CustomItemBuilder) -> StorefrontResult<CartLine> {
        if self.mode.current() == Mode::Remote {
            self.events.notice(
                NoticeLevel::Info,
                "Custom items are built in the offline cart. Switch to offline mode to add one",
            );
            return Err(StorefrontError::CustomItemOffline);
        }
        let line = builder.build(util::snowflake_id());
        let added = line.clone();
        self.mutate_local(|cart| {
            cart.add(line);
            true
        })
        .await;
        tracing::debug!(name = %added.name, quantity = added.quantity, "Custom item added");
        Ok(added)
    }

    /// Change a line's quantity by `delta`. Reaching zero removes the line.
    /// Unknown ids are a no-op.
    pub async fn update_quantity(&self, item_id: i64, delta: i64) -> StorefrontResult<()> {
        if delta == 0 {
            return Ok(());
        }

        match self.mode.current() {
            Mode::Remote => {
                let current = self.cart.lock().await.get(item_id).map(|l| l.quantity);
                let Some(current) = current else {
                    tracing::debug!(item_id, "update_quantity on missing line ignored");
                    return Ok(());
                };

                let next = i64::from(current).saturating_add(delta);
                let result = if next <= 0 {
                    self.gateway.remove_from_cart(item_id).await
                } else {
                    let quantity = u32::try_from(next).unwrap_or(u32::MAX);
                    self.gateway
                        .update_cart_item(&UpdateCartItemRequest { item_id, quantity })
                        .await
                };
                result.map_err(|e| self.report("update cart", e.into()))?;
                self.pull().await;
            }
            Mode::Local => {
                self.mutate_local(|cart| cart.adjust(item_id, delta)).await;
            }
        }
        Ok(())
    }

    /// Unknown ids are a no-op.
    pub async fn remove_item(&self, item_id: i64) -> StorefrontResult<()> {
        match self.mode.current() {
            Mode::Remote => {
                self.gateway
                    .remove_from_cart(item_id)
                    .await
                    .map_err(|e| self.report("remove item from cart", e.into()))?;
                self.pull().await;
            }
            Mode::Local => {
                self.mutate_local(|cart| cart.remove(item_id)).await;
            }
        }
        Ok(())
    }

    /// Empty the replica and hand back what it held.
    pub(crate) async fn take_lines(&self) -> Vec<CartLine> {
        let lines = self.cart.lock().await.take();
        if !lines.is_empty() {
            self.emit_changed(&Cart::new());
        }
        lines
    }

    // ===== Sync =====

    /// Periodic pull-and-diff, remote-backed only.
    ///
    /// Returns whether the replica changed. A failed pull demotes
    /// connectivity; the session keeps going in local-only mode.
    pub async fn sync_tick(&self) -> StorefrontResult<bool> {
        if self.mode.current() != Mode::Remote {
            return Ok(false);
        }

        match self.gateway.fetch_cart().await {
            Ok(lines) => Ok(self.replace_if_changed(lines).await),
            Err(e) => {
                tracing::warn!(error = %e, "Cart sync failed");
                if e.is_transport() {
                    self.connectivity().demote();
                }
                Err(e.into())
            }
        }
    }

    /// Re-pull after a successful remote mutation. A failed pull is left to
    /// the next sync tick.
    async fn pull(&self) {
        match self.gateway.fetch_cart().await {
            Ok(lines) => {
                self.replace_if_changed(lines).await;
            }
            Err(e) => tracing::warn!(error = %e, "Cart re-pull after mutation failed"),
        }
    }

    async fn replace_if_changed(&self, lines: Vec<CartLine>) -> bool {
        let pulled = Cart::from_lines(lines);
        {
            let mut cart = self.cart.lock().await;
            if *cart == pulled {
                return false;
            }
            *cart = pulled.clone();
        }
        tracing::debug!(lines = pulled.len(), "Cart replaced from remote");
        self.emit_changed(&pulled);
        true
    }

    async fn mutate_local<F>(&self, f: F)
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let changed = {
            let mut cart = self.cart.lock().await;
            f(&mut *cart).then(|| cart.clone())
        };
        if let Some(cart) = changed {
            self.emit_changed(&cart);
        }
    }

    fn emit_changed(&self, cart: &Cart) {
        self.events.emit(SessionEvent::CartChanged {
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        });
    }

    fn report(&self, action: &str, err: StorefrontError) -> StorefrontError {
        tracing::warn!(action, error = %err, "Cart operation failed");
        self.events
            .notice(NoticeLevel::Error, format!("Failed to {action}: {err}"));
        err
    }
}
