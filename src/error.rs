use std::sync::Arc;

use thiserror::Error;

use crate::models::order::{OrderId, OrderStatus};

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("order {order_id} references item {item_id}, menu has {menu_len} items")]
    InvalidItemReference {
        order_id: OrderId,
        item_id: u32,
        menu_len: usize,
    },

    #[error("sales log line {line} is not a decimal: {content:?}")]
    MalformedLogEntry { line: usize, content: String },

    #[error("sales log unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("order {order_id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("console i/o failed: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}
