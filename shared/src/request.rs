//! Request bodies for the remote order service
//!
//! Field names follow the remote contract (camelCase).

use serde::{Deserialize, Serialize};

use crate::models::DeliveryType;

/// `POST /cart`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub item_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub instructions: String,
}

/// `PUT /cart`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub item_id: i64,
    pub quantity: u32,
}

/// `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub delivery_type: DeliveryType,
    pub address: String,
    pub phone: String,
}
