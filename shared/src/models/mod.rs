//! Domain models

pub mod cart;
pub mod menu;
pub mod order;

pub use cart::{Cart, CartLine};
pub use menu::{MenuItem, MenuItemInput};
pub use order::{Charges, DeliveryType, Order, OrderStatus};
