//! Money helpers using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal`. The wire format (and the persisted
//! order history) carries plain JSON numbers, converted at the boundary.

use rust_decimal::prelude::*;

/// Rounding precision for monetary values (2 decimal places, half-up)
pub const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Sales tax rate applied to the subtotal (8%)
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Standard delivery fee (3.99)
pub const STANDARD_DELIVERY_FEE: Decimal = Decimal::from_parts(399, 0, 0, false, 2);

/// Express delivery fee (6.99)
pub const EXPRESS_DELIVERY_FEE: Decimal = Decimal::from_parts(699, 0, 0, false, 2);

/// Convert an f64 from the wire into a Decimal rounded to cents.
///
/// Returns `None` for NaN and infinities.
#[inline]
pub fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(round2)
}

/// Convert a Decimal back to f64 for serialization, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or_default()
}

/// Round half away from zero to 2 decimal places
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether two amounts agree within [`MONEY_TOLERANCE`]
#[inline]
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= MONEY_TOLERANCE
}

/// Serde adapter: `Decimal` <-> JSON number (2dp)
///
/// Use with `#[serde(with = "crate::money::as_f64")]`.
pub mod as_f64 {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::to_f64(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        super::to_decimal(raw)
            .ok_or_else(|| de::Error::custom(format!("non-finite amount: {raw}")))
    }
}
