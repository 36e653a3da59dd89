use thiserror::Error;

use super::status::OrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Order not found")]
    OrderNotFound,
    #[error("Caller may not act on this order")]
    Forbidden,
    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Product is not available for purchase")]
    ProductUnavailable,
    #[error("Insufficient stock")]
    InsufficientStock,
    #[error("Address does not belong to the caller")]
    AddressNotOwned,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
