//! Menu Catalog
//!
//! Read-mostly replica of the menu. Loaded at session start (remote pull,
//! else the built-in seed), refreshed with the same diff / wholesale-replace
//! discipline as the cart, and editable through the admin operations.

use std::collections::BTreeSet;
use std::sync::Arc;

use foodie_client::RemoteGateway;
use rust_decimal::Decimal;
use shared::models::{MenuItem, MenuItemInput};
use shared::money;
use tokio::sync::RwLock;

use super::mode::{Mode, ModeController};
use crate::error::{StorefrontError, StorefrontResult};
use crate::events::{EventBus, NoticeLevel, SessionEvent};

// ===== Seed =====

const IMG: &str = "?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80";

/// (id, name, description, price in cents, category, unsplash photo id)
const SEED: [(i64, &str, &str, i64, &str, &str); 12] = [
    (1, "Margherita Pizza", "Fresh San Marzano tomatoes, buffalo mozzarella, fresh basil, extra virgin olive oil", 1699, "pizza", "photo-1604382354936-07c5d9983bd3"),
    (2, "Pepperoni Supreme", "Premium pepperoni, mozzarella cheese, rich tomato sauce, oregano", 1999, "pizza", "photo-1565299624946-b28f40a0ca4b"),
    (3, "Truffle Mushroom Pizza", "Wild mushrooms, truffle oil, mozzarella, arugula, parmesan shavings", 2499, "pizza", "photo-1513104890138-7c749659a591"),
    (4, "Gourmet Beef Burger", "Wagyu beef patty, aged cheddar, caramelized onions, truffle aioli, brioche bun", 1899, "burger", "photo-1568901346375-23c9450c58cd"),
    (5, "BBQ Bacon Burger", "Beef patty, crispy bacon, BBQ sauce, onion rings, cheddar cheese", 1699, "burger", "photo-1571091718767-18b5b1457add"),
    (6, "Chicken Avocado Burger", "Grilled chicken breast, fresh avocado, lettuce, tomato, herb mayo", 1599, "burger", "photo-1606755962773-d324e9a13086"),
    (7, "Lobster Ravioli", "Fresh lobster ravioli in creamy saffron sauce with cherry tomatoes", 2899, "pasta", "photo-1551183053-bf91a1d81141"),
    (8, "Truffle Carbonara", "Fresh pasta with eggs, pecorino romano, pancetta, black truffle shavings", 2299, "pasta", "photo-1473093295043-cdd812d0e601"),
    (9, "Seafood Linguine", "Fresh linguine with shrimp, scallops, mussels in white wine garlic sauce", 2699, "pasta", "photo-1551892374-ecf8754cf8b0"),
    (10, "Chocolate Lava Cake", "Warm chocolate cake with molten center, vanilla ice cream, berry compote", 999, "dessert", "photo-1578985545062-69928b1d9587"),
    (11, "Classic Tiramisu", "Traditional Italian dessert with mascarpone, coffee, cocoa, ladyfingers", 899, "dessert", "photo-1571877227200-a0d98ea607e9"),
    (12, "Crème Brûlée", "Vanilla custard with caramelized sugar crust, fresh berries", 1099, "dessert", "photo-1470324161839-ce2bb6fa6bc3"),
];

/// Built-in menu used when the remote service is unreachable.
pub fn seed_menu() -> Vec<MenuItem> {
    SEED.iter()
        .map(|&(id, name, description, cents, category, photo)| MenuItem {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::new(cents, 2),
            category: category.to_string(),
            image_url: format!("https://images.unsplash.com/{photo}{IMG}"),
            available: true,
        })
        .collect()
}

// ===== Stats =====

#[derive(Debug, Clone, PartialEq)]
pub struct MenuStats {
    pub item_count: usize,
    pub available_count: usize,
    pub category_count: usize,
    /// Mean price, rounded to cents (zero for an empty menu)
    pub average_price: Decimal,
}

impl MenuStats {
    pub fn of(items: &[MenuItem]) -> Self {
        let categories: BTreeSet<&str> = items.iter().map(|i| i.category.as_str()).collect();
        let average_price = if items.is_empty() {
            Decimal::ZERO
        } else {
            let total: Decimal = items.iter().map(|i| i.price).sum();
            money::round2(total / Decimal::from(items.len()))
        };
        Self {
            item_count: items.len(),
            available_count: items.iter().filter(|i| i.available).count(),
            category_count: categories.len(),
            average_price,
        }
    }
}

// ===== Catalog =====

#[derive(Clone)]
pub struct Catalog {
    gateway: Arc<dyn RemoteGateway>,
    mode: ModeController,
    items: Arc<RwLock<Vec<MenuItem>>>,
    events: EventBus,
}

impl Catalog {
    pub fn new(gateway: Arc<dyn RemoteGateway>, mode: ModeController, events: EventBus) -> Self {
        Self {
            gateway,
            mode,
            items: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    /// Initial load. Returns `true` when the menu came from the remote.
    pub async fn load(&self) -> bool {
        if self.mode.current() == Mode::Remote {
            match self.gateway.fetch_menu().await {
                Ok(items) => {
                    self.replace_if_changed(items).await;
                    return true;
                }
                Err(e) => tracing::warn!(error = %e, "Menu pull failed, using built-in menu"),
            }
        }
        self.replace_if_changed(seed_menu()).await;
        false
    }

    /// Periodic refresh, remote-backed only. Returns whether the menu changed.
    pub async fn refresh_tick(&self) -> StorefrontResult<bool> {
        if self.mode.current() != Mode::Remote {
            return Ok(false);
        }
        let items = self.gateway.fetch_menu().await.map_err(|e| {
            tracing::debug!(error = %e, "Menu refresh failed");
            StorefrontError::from(e)
        })?;
        Ok(self.replace_if_changed(items).await)
    }

    async fn replace_if_changed(&self, items: Vec<MenuItem>) -> bool {
        let count = items.len();
        {
            let mut current = self.items.write().await;
            if *current == items {
                return false;
            }
            *current = items;
        }
        tracing::debug!(count, "Menu replaced");
        self.events.emit(SessionEvent::MenuChanged { count });
        true
    }

    /// Re-pull after a successful remote mutation. A failed pull is left to
    /// the next refresh tick.
    async fn pull(&self) {
        match self.gateway.fetch_menu().await {
            Ok(items) => {
                self.replace_if_changed(items).await;
            }
            Err(e) => tracing::warn!(error = %e, "Menu re-pull after mutation failed"),
        }
    }

    fn report(&self, action: &str, err: StorefrontError) -> StorefrontError {
        tracing::warn!(action, error = %err, "Menu operation failed");
        self.events
            .notice(NoticeLevel::Error, format!("Failed to {action}: {err}"));
        err
    }

    // ===== Queries =====

    pub async fn items(&self) -> Vec<MenuItem> {
        self.items.read().await.clone()
    }

    pub async fn find(&self, id: i64) -> Option<MenuItem> {
        self.items.read().await.iter().find(|i| i.id == id).cloned()
    }

    /// Case-insensitive; `"all"` returns everything.
    pub async fn by_category(&self, category: &str) -> Vec<MenuItem> {
        let items = self.items.read().await;
        if category.eq_ignore_ascii_case("all") {
            return items.clone();
        }
        items
            .iter()
            .filter(|i| i.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    pub async fn categories(&self) -> Vec<String> {
        let items = self.items.read().await;
        let set: BTreeSet<&str> = items.iter().map(|i| i.category.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub async fn stats(&self) -> MenuStats {
        MenuStats::of(&self.items.read().await)
    }

    // ===== Admin =====

    pub async fn add_item(&self, input: MenuItemInput) -> StorefrontResult<()> {
        match self.mode.current() {
            Mode::Remote => {
                self.gateway
                    .create_menu_item(&input)
                    .await
                    .map_err(|e| self.report("add menu item", e.into()))?;
                self.pull().await;
            }
            Mode::Local => {
                let count = {
                    let mut items = self.items.write().await;
                    let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
                    tracing::info!(item_id = id, name = %input.name, "Menu item added locally");
                    items.push(input.into_item(id));
                    items.len()
                };
                self.events.emit(SessionEvent::MenuChanged { count });
            }
        }
        Ok(())
    }

    pub async fn update_item(&self, id: i64, input: MenuItemInput) -> StorefrontResult<()> {
        match self.mode.current() {
            Mode::Remote => {
                self.gateway
                    .update_menu_item(id, &input)
                    .await
                    .map_err(|e| self.report("update menu item", e.into()))?;
                self.pull().await;
            }
            Mode::Local => {
                let count = {
                    let mut items = self.items.write().await;
                    let item = items
                        .iter_mut()
                        .find(|i| i.id == id)
                        .ok_or(StorefrontError::UnknownMenuItem(id))?;
                    input.apply_to(item);
                    items.len()
                };
                self.events.emit(SessionEvent::MenuChanged { count });
            }
        }
        Ok(())
    }

    pub async fn delete_item(&self, id: i64) -> StorefrontResult<()> {
        match self.mode.current() {
            Mode::Remote => {
                self.gateway
                    .delete_menu_item(id)
                    .await
                    .map_err(|e| self.report("delete menu item", e.into()))?;
                self.pull().await;
            }
            Mode::Local => {
                let count = {
                    let mut items = self.items.write().await;
                    let before = items.len();
                    items.retain(|i| i.id != id);
                    if items.len() == before {
                        return Err(StorefrontError::UnknownMenuItem(id));
                    }
                    items.len()
                };
                self.events.emit(SessionEvent::MenuChanged { count });
            }
        }
        Ok(())
    }
}
