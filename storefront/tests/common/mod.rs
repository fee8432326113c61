//! In-memory stand-in for the remote order service

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use storefront::StorefrontConfig;
use storefront::foodie_client::{ClientError, ClientResult, PlacedOrder, RemoteGateway};
use storefront::shared::models::{
    Cart, CartLine, Charges, MenuItem, MenuItemInput, Order, OrderStatus,
};
use storefront::shared::request::{AddCartItemRequest, CreateOrderRequest, UpdateCartItemRequest};
use storefront::core::seed_menu;

#[derive(Default)]
pub struct FakeState {
    pub online: bool,
    pub fail_cart_post: bool,
    pub fail_orders: bool,
    /// Menu reads never complete
    pub hang_menu: bool,
    pub menu: Vec<MenuItem>,
    pub cart: Cart,
    pub orders: Vec<Order>,
    pub next_order: u32,
    pub calls: Vec<String>,
}

pub struct FakeGateway {
    pub state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new(online: bool) -> Self {
        Self {
            state: Mutex::new(FakeState {
                online,
                menu: seed_menu(),
                ..Default::default()
            }),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.state.lock().unwrap().online = online;
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Put a menu line straight into the remote cart.
    pub fn seed_cart(&self, item_id: i64, quantity: u32) {
        let mut s = self.state.lock().unwrap();
        let item = s.menu.iter().find(|i| i.id == item_id).cloned().unwrap();
        s.cart.add(CartLine::from_menu_item(&item, quantity, None));
    }

    fn enter(&self, call: &str) -> ClientResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(call.to_string());
        if !s.online {
            return Err(ClientError::Status {
                status: 503,
                body: "offline".into(),
            });
        }
        Ok(s)
    }
}

fn ok() -> ClientResult<()> {
    Ok(())
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        let hang = self.state.lock().unwrap().hang_menu;
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(self.enter("GET /menu")?.menu.clone())
    }

    async fn create_menu_item(&self, item: &MenuItemInput) -> ClientResult<()> {
        let mut s = self.enter("POST /menu")?;
        let id = s.menu.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        s.menu.push(item.clone().into_item(id));
        ok()
    }

    async fn update_menu_item(&self, item_id: i64, item: &MenuItemInput) -> ClientResult<()> {
        let mut s = self.enter("PUT /menu")?;
        match s.menu.iter_mut().find(|i| i.id == item_id) {
            Some(existing) => {
                item.clone().apply_to(existing);
                ok()
            }
            None => Err(ClientError::Rejected("Menu item not found".into())),
        }
    }

    async fn delete_menu_item(&self, item_id: i64) -> ClientResult<()> {
        let mut s = self.enter("DELETE /menu")?;
        s.menu.retain(|i| i.id != item_id);
        ok()
    }

    async fn fetch_cart(&self) -> ClientResult<Vec<CartLine>> {
        Ok(self.enter("GET /cart")?.cart.lines().to_vec())
    }

    async fn add_to_cart(&self, req: &AddCartItemRequest) -> ClientResult<()> {
        let mut s = self.enter("POST /cart")?;
        if s.fail_cart_post {
            return Err(ClientError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        let Some(item) = s.menu.iter().find(|i| i.id == req.item_id).cloned() else {
            return Err(ClientError::Rejected("Menu item not found".into()));
        };
        s.cart
            .add(CartLine::from_menu_item(&item, req.quantity, Some(req.instructions.clone())));
        ok()
    }

    async fn update_cart_item(&self, req: &UpdateCartItemRequest) -> ClientResult<()> {
        let mut s = self.enter("PUT /cart")?;
        let current = s.cart.get(req.item_id).map(|l| i64::from(l.quantity));
        match current {
            Some(q) => {
                s.cart.adjust(req.item_id, i64::from(req.quantity) - q);
                ok()
            }
            None => Err(ClientError::Rejected("Item not found in cart".into())),
        }
    }

    async fn remove_from_cart(&self, item_id: i64) -> ClientResult<()> {
        let mut s = self.enter("DELETE /cart")?;
        s.cart.remove(item_id);
        ok()
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        let s = self.enter("GET /orders")?;
        if s.fail_orders {
            return Err(ClientError::InvalidResponse("unknown status".into()));
        }
        Ok(s.orders.clone())
    }

    async fn create_order(&self, req: &CreateOrderRequest) -> ClientResult<PlacedOrder> {
        let mut s = self.enter("POST /orders")?;
        if s.cart.is_empty() {
            return Err(ClientError::Rejected("Cart is empty".into()));
        }
        s.next_order += 1;
        let order_id = format!("ORD-{}", s.next_order);
        let lines = s.cart.take();
        let total = Charges::compute(&lines, req.delivery_type).total;
        s.orders.push(Order {
            id: order_id.clone(),
            created_at: Utc::now(),
            lines: Vec::new(),
            delivery: req.delivery_type,
            status: OrderStatus::Preparing,
            total,
            charges: None,
        });
        Ok(PlacedOrder { order_id, total })
    }
}

pub fn config(data_dir: &std::path::Path, offline_only: bool) -> StorefrontConfig {
    StorefrontConfig {
        data_dir: data_dir.to_path_buf(),
        offline_only,
        shutdown_timeout_ms: 1_000,
        ..Default::default()
    }
}
