//! Storefront error types

use foodie_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Remote unusable (transport failure, bad status, malformed body)
    #[error("Remote service unavailable: {0}")]
    Remote(ClientError),

    /// Remote answered and refused the operation
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(i64),

    #[error("Unknown custom base: {0}")]
    UnknownCustomBase(String),

    /// Custom items only exist in the local replica
    #[error("Custom items can only be added while offline")]
    CustomItemOffline,

    #[error("Order store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClientError> for StorefrontError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected(msg) => Self::Rejected(msg),
            other => Self::Remote(other),
        }
    }
}

impl StorefrontError {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

pub type StorefrontResult<T> = Result<T, StorefrontError>;
