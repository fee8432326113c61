//! Remote gateway - typed endpoints of the order service
//!
//! ```text
//! GET    /menu                  -> [MenuItem]
//! POST   /menu                  -> {success}
//! PUT    /menu?itemId=          -> {success}
//! DELETE /menu?itemId=          -> {success}
//! GET    /cart                  -> {items: [...]}
//! POST   /cart                  -> {success}
//! PUT    /cart                  -> {success}
//! DELETE /cart?itemId=          -> {success}
//! GET    /orders                -> [{orderId, orderTime, totalAmount, status}]
//! POST   /orders                -> {success, orderId, total}
//! ```
//!
//! Responses are parsed into explicit records; anything that does not match
//! is reported as [`ClientError::InvalidResponse`].

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use shared::models::{CartLine, MenuItem, MenuItemInput, Order};
use shared::money;
use shared::request::{AddCartItemRequest, CreateOrderRequest, UpdateCartItemRequest};
use shared::response::{Ack, CartResponse, CreateOrderResponse, RemoteOrder};

use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// Identifier and authoritative total assigned by the remote at checkout
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order_id: String,
    pub total: Decimal,
}

/// The only channel to the remote service.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>>;
    async fn create_menu_item(&self, item: &MenuItemInput) -> ClientResult<()>;
    async fn update_menu_item(&self, item_id: i64, item: &MenuItemInput) -> ClientResult<()>;
    async fn delete_menu_item(&self, item_id: i64) -> ClientResult<()>;

    async fn fetch_cart(&self) -> ClientResult<Vec<CartLine>>;
    async fn add_to_cart(&self, req: &AddCartItemRequest) -> ClientResult<()>;
    async fn update_cart_item(&self, req: &UpdateCartItemRequest) -> ClientResult<()>;
    async fn remove_from_cart(&self, item_id: i64) -> ClientResult<()>;

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>>;
    async fn create_order(&self, req: &CreateOrderRequest) -> ClientResult<PlacedOrder>;

    /// Lightweight read used for connectivity checks.
    async fn probe(&self) -> ClientResult<()> {
        self.fetch_menu().await.map(|_| ())
    }
}

/// Typed gateway over any [`HttpClient`]
#[derive(Debug, Clone)]
pub struct FoodieApi<C> {
    http: C,
}

impl<C: HttpClient> FoodieApi<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

fn encode<T: serde::Serialize>(value: &T) -> ClientResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn expect_ack(value: Value) -> ClientResult<()> {
    let ack: Ack = decode(value)?;
    if ack.success {
        Ok(())
    } else {
        Err(ClientError::Rejected(
            ack.message.unwrap_or_else(|| "operation refused".into()),
        ))
    }
}

fn item_query(item_id: i64) -> [(&'static str, String); 1] {
    [("itemId", item_id.to_string())]
}

#[async_trait]
impl<C: HttpClient> RemoteGateway for FoodieApi<C> {
    async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        decode(self.http.get("menu").await?)
    }

    async fn create_menu_item(&self, item: &MenuItemInput) -> ClientResult<()> {
        expect_ack(self.http.post("menu", encode(item)?).await?)
    }

    async fn update_menu_item(&self, item_id: i64, item: &MenuItemInput) -> ClientResult<()> {
        expect_ack(self.http.put("menu", &item_query(item_id), encode(item)?).await?)
    }

    async fn delete_menu_item(&self, item_id: i64) -> ClientResult<()> {
        expect_ack(self.http.delete("menu", &item_query(item_id)).await?)
    }

    async fn fetch_cart(&self) -> ClientResult<Vec<CartLine>> {
        let cart: CartResponse = decode(self.http.get("cart").await?)?;
        Ok(cart.into_lines()?)
    }

    async fn add_to_cart(&self, req: &AddCartItemRequest) -> ClientResult<()> {
        expect_ack(self.http.post("cart", encode(req)?).await?)
    }

    async fn update_cart_item(&self, req: &UpdateCartItemRequest) -> ClientResult<()> {
        expect_ack(self.http.put("cart", &[], encode(req)?).await?)
    }

    async fn remove_from_cart(&self, item_id: i64) -> ClientResult<()> {
        expect_ack(self.http.delete("cart", &item_query(item_id)).await?)
    }

    async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        let orders: Vec<RemoteOrder> = decode(self.http.get("orders").await?)?;
        orders
            .into_iter()
            .map(|o| Order::try_from(o).map_err(ClientError::from))
            .collect()
    }

    async fn create_order(&self, req: &CreateOrderRequest) -> ClientResult<PlacedOrder> {
        let resp: CreateOrderResponse = decode(self.http.post("orders", encode(req)?).await?)?;
        if !resp.success {
            return Err(ClientError::Rejected(
                resp.message.unwrap_or_else(|| "order refused".into()),
            ));
        }

        let order_id = resp
            .order_id
            .ok_or_else(|| ClientError::InvalidResponse("Missing orderId".into()))?;
        let total = resp
            .total
            .and_then(money::to_decimal)
            .ok_or_else(|| ClientError::InvalidResponse("Missing order total".into()))?;

        Ok(PlacedOrder { order_id, total })
    }
}
