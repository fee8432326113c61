//! Storefront core
//!
//! ```text
//! ConnectionMonitor ──► Connectivity ◄── CartReconciler::sync_tick (demote only)
//!                            │
//!                      ModeController
//!                            │
//!        ┌───────────────────┼──────────────────┐
//!   CartReconciler     OrderReconciler       Catalog
//!        └──────── RemoteGateway (foodie-client) ┘
//! ```

pub mod cart;
pub mod catalog;
pub mod connection_monitor;
pub mod connectivity;
pub mod custom;
pub mod mode;
pub mod orders;
pub mod session;
pub mod store;

pub use cart::CartReconciler;
pub use catalog::{Catalog, MenuStats, seed_menu};
pub use connection_monitor::ConnectionMonitor;
pub use connectivity::{Connectivity, ConnectivityState};
pub use custom::{CustomBase, CustomItemBuilder, Topping};
pub use mode::{Mode, ModeController};
pub use orders::{ClassifiedOrders, OrderReconciler, classify};
pub use session::Session;
pub use store::OrderStore;
