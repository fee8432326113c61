//! Foodie Client - remote gateway for the order service
//!
//! Issues requests to the remote menu / cart / order service and parses the
//! JSON responses into typed records. Every failure comes back as a
//! [`ClientError`]; nothing here retries.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{FoodieApi, PlacedOrder, RemoteGateway};
pub use http::{HttpClient, NetworkHttpClient};
