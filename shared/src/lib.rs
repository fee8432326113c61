//! Shared types for the Foodie storefront
//!
//! Domain model, wire records for the remote order service, money helpers
//! and small utilities used by both the gateway and the storefront core.

pub mod error;
pub mod models;
pub mod money;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use error::ModelError;
pub use models::{
    Cart, CartLine, Charges, DeliveryType, MenuItem, MenuItemInput, Order, OrderStatus,
};
pub use serde::{Deserialize, Serialize};
