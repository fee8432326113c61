//! Response records of the remote order service
//!
//! One record type per endpoint. Conversions into the domain model validate
//! the shape and fail closed with [`ModelError`].

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::models::order::parse_remote_time;
use crate::models::{CartLine, DeliveryType, Order, OrderStatus};
use crate::money;

/// `{success, message?}` acknowledgement returned by every mutating call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /cart`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<RemoteCartItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
}

impl CartResponse {
    pub fn into_lines(self) -> Result<Vec<CartLine>, ModelError> {
        self.items.into_iter().map(CartLine::try_from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCartItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl TryFrom<RemoteCartItem> for CartLine {
    type Error = ModelError;

    fn try_from(item: RemoteCartItem) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(item.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or(ModelError::InvalidQuantity {
                item_id: item.id,
                quantity: item.quantity,
            })?;
        let unit_price = money::to_decimal(item.price).ok_or(ModelError::InvalidAmount {
            field: "price",
            value: item.price,
        })?;

        Ok(CartLine {
            id: item.id,
            name: item.name,
            description: item.description,
            unit_price,
            quantity,
            instructions: crate::models::cart::normalize_instructions(item.instructions),
            is_custom: false,
        })
    }
}

/// One entry of `GET /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrder {
    pub order_id: String,
    pub order_time: String,
    pub total_amount: f64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,
}

impl TryFrom<RemoteOrder> for Order {
    type Error = ModelError;

    fn try_from(order: RemoteOrder) -> Result<Self, Self::Error> {
        // deliveryType is free text upstream; only status is contractual
        let delivery = match order.delivery_type.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                raw.parse::<DeliveryType>().unwrap_or_else(|_| {
                    tracing::debug!(
                        order_id = %order.order_id,
                        delivery_type = raw,
                        "Unrecognised delivery type, using standard"
                    );
                    DeliveryType::Standard
                })
            }
            _ => DeliveryType::Standard,
        };
        let total = money::to_decimal(order.total_amount).ok_or(ModelError::InvalidAmount {
            field: "totalAmount",
            value: order.total_amount,
        })?;

        Ok(Order {
            id: order.order_id,
            created_at: parse_remote_time(&order.order_time)?,
            lines: Vec::new(),
            delivery,
            status: OrderStatus::from_remote(&order.status)?,
            total,
            charges: None,
        })
    }
}

/// `POST /orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
