//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use crate::error::ModelError;
use crate::money::{self, EXPRESS_DELIVERY_FEE, STANDARD_DELIVERY_FEE, TAX_RATE};

/// Delivery option chosen at checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    #[default]
    Standard,
    Express,
}

impl DeliveryType {
    pub fn fee(&self) -> Decimal {
        match self {
            Self::Standard => STANDARD_DELIVERY_FEE,
            Self::Express => EXPRESS_DELIVERY_FEE,
        }
    }

    /// Estimated delivery window in minutes (min, max)
    pub fn eta_minutes(&self) -> (u32, u32) {
        match self {
            Self::Standard => (30, 45),
            Self::Express => (15, 25),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }
}

impl std::str::FromStr for DeliveryType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            other => Err(ModelError::UnknownDeliveryType(other.to_string())),
        }
    }
}

impl std::fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status as shown to the customer
///
/// Never advanced locally after creation; every later value comes from the
/// remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Preparing,
    OnTheWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Map the remote status vocabulary onto the local enum.
    ///
    /// | remote                           | local      |
    /// |----------------------------------|------------|
    /// | PENDING, CONFIRMED, PREPARING    | preparing  |
    /// | ON_THE_WAY                       | on-the-way |
    /// | DELIVERED                        | delivered  |
    /// | CANCELLED                        | cancelled  |
    pub fn from_remote(status: &str) -> Result<Self, ModelError> {
        let normalized = status.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "PENDING" | "CONFIRMED" | "PREPARING" => Ok(Self::Preparing),
            "ON_THE_WAY" => Ok(Self::OnTheWay),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" | "CANCELED" => Ok(Self::Cancelled),
            _ => Err(ModelError::UnknownStatus(status.to_string())),
        }
    }

    /// Delivered and cancelled orders never move again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Preparing => "Preparing your order",
            Self::OnTheWay => "On the way",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Checkout breakdown
///
/// Invariants: `tax == round2(subtotal × 0.08)` and
/// `total == subtotal + delivery_fee + tax`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charges {
    #[serde(with = "crate::money::as_f64")]
    pub subtotal: Decimal,
    #[serde(with = "crate::money::as_f64")]
    pub delivery_fee: Decimal,
    #[serde(with = "crate::money::as_f64")]
    pub tax: Decimal,
    #[serde(with = "crate::money::as_f64")]
    pub total: Decimal,
}

impl Charges {
    pub fn compute(lines: &[CartLine], delivery: DeliveryType) -> Self {
        let subtotal = money::round2(lines.iter().map(CartLine::line_total).sum());
        let delivery_fee = delivery.fee();
        let tax = money::round2(subtotal * TAX_RATE);
        Self {
            subtotal,
            delivery_fee,
            tax,
            total: subtotal + delivery_fee + tax,
        }
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Snapshot of the cart at checkout (empty for orders listed by the remote)
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub delivery: DeliveryType,
    pub status: OrderStatus,
    #[serde(with = "crate::money::as_f64")]
    pub total: Decimal,
    /// Present whenever the breakdown was computed by this client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<Charges>,
}

impl Order {
    /// A freshly placed order. Status starts at preparing.
    pub fn placed(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        lines: Vec<CartLine>,
        delivery: DeliveryType,
    ) -> Self {
        let charges = Charges::compute(&lines, delivery);
        Self {
            id: id.into(),
            created_at,
            lines,
            delivery,
            status: OrderStatus::Preparing,
            total: charges.total,
            charges: Some(charges),
        }
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Parse a remote order timestamp.
///
/// Accepts RFC 3339 and offset-less ISO local date-times
/// (`2024-05-01T12:30`, `2024-05-01T12:30:05.123`), the latter read as UTC.
pub fn parse_remote_time(raw: &str) -> Result<DateTime<Utc>, ModelError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ModelError::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line(price_cents: i64, qty: u32) -> CartLine {
        CartLine {
            id: price_cents,
            name: "Item".to_string(),
            description: String::new(),
            unit_price: Decimal::new(price_cents, 2),
            quantity: qty,
            instructions: None,
            is_custom: false,
        }
    }

    #[test]
    fn charges_follow_total_law() {
        let lines = vec![line(1699, 2), line(899, 1)]; // 33.98 + 8.99 = 42.97
        let c = Charges::compute(&lines, DeliveryType::Standard);
        assert_eq!(c.subtotal, Decimal::new(4297, 2));
        assert_eq!(c.delivery_fee, Decimal::new(399, 2));
        assert_eq!(c.tax, Decimal::new(344, 2)); // 3.4376 -> 3.44
        assert_eq!(c.total, c.subtotal + c.delivery_fee + c.tax);
        assert_eq!(c.total, Decimal::new(5040, 2));
    }

    #[test]
    fn express_fee() {
        let c = Charges::compute(&[line(1000, 1)], DeliveryType::Express);
        assert_eq!(c.delivery_fee, Decimal::new(699, 2));
        assert_eq!(c.tax, Decimal::new(80, 2));
        assert_eq!(c.total, Decimal::new(1779, 2));
    }

    #[test]
    fn tax_is_rounded_half_up() {
        let c = Charges::compute(&[line(6, 1)], DeliveryType::Standard);
        assert_eq!(c.tax, money::round2(c.subtotal * TAX_RATE));
        assert_eq!(c.total, c.subtotal + c.delivery_fee + c.tax);
    }

    #[test]
    fn remote_status_mapping() {
        assert_eq!(OrderStatus::from_remote("PENDING").unwrap(), OrderStatus::Preparing);
        assert_eq!(OrderStatus::from_remote("CONFIRMED").unwrap(), OrderStatus::Preparing);
        assert_eq!(OrderStatus::from_remote("PREPARING").unwrap(), OrderStatus::Preparing);
        assert_eq!(OrderStatus::from_remote("ON_THE_WAY").unwrap(), OrderStatus::OnTheWay);
        assert_eq!(OrderStatus::from_remote("on-the-way").unwrap(), OrderStatus::OnTheWay);
        assert_eq!(OrderStatus::from_remote("DELIVERED").unwrap(), OrderStatus::Delivered);
        assert_eq!(OrderStatus::from_remote("CANCELLED").unwrap(), OrderStatus::Cancelled);
        assert!(matches!(
            OrderStatus::from_remote("LOST"),
            Err(ModelError::UnknownStatus(_))
        ));
    }

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OnTheWay).unwrap(),
            "\"on-the-way\""
        );
    }

    #[test]
    fn delivery_type_parse() {
        assert_eq!("Express".parse::<DeliveryType>().unwrap(), DeliveryType::Express);
        assert_eq!("standard".parse::<DeliveryType>().unwrap(), DeliveryType::Standard);
        assert!("drone".parse::<DeliveryType>().is_err());
    }

    #[test]
    fn placed_order_starts_preparing() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let order = Order::placed("L-1", at, vec![line(1000, 2)], DeliveryType::Standard);
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.item_count(), 2);
        assert_eq!(Some(order.total), order.charges.map(|c| c.total));
    }

    #[test]
    fn parse_remote_time_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_remote_time("2024-05-01T12:30").unwrap(), expected);
        assert_eq!(parse_remote_time("2024-05-01T12:30:00").unwrap(), expected);
        assert_eq!(parse_remote_time("2024-05-01T12:30:00.000").unwrap(), expected);
        assert_eq!(parse_remote_time("2024-05-01T14:30:00+02:00").unwrap(), expected);
        assert!(parse_remote_time("yesterday").is_err());
    }

    #[test]
    fn order_round_trips_through_json() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let order = Order::placed("L-1", at, vec![line(1699, 1)], DeliveryType::Express);
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
