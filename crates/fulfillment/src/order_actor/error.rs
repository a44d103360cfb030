//! Error types for the Order actor.

use crate::error::{framework_kind, ErrorKind};
use crate::inventory_actor::InventoryError;
use crate::model::{DishId, OrderStatus, PromoRejection};
use crate::promo_actor::PromoError;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The order has no items.
    #[error("Order has no items")]
    EmptyOrder,

    /// A line asks for zero units.
    #[error("Invalid quantity for {dish_id}")]
    InvalidQuantity { dish_id: DishId },

    /// The catalog does not know this dish.
    #[error("Dish not found: {0}")]
    DishNotFound(DishId),

    /// The catalog priced this dish below zero.
    #[error("Invalid price for {dish_id}")]
    InvalidPrice { dish_id: DishId },

    /// The promo code could not be applied; the reason is the promo engine's.
    #[error("Promo code rejected: {0}")]
    PromoRejected(PromoRejection),

    /// Not enough stock for this dish. Nothing was reserved.
    #[error("Insufficient stock for {dish_id}")]
    InsufficientStock { dish_id: DishId },

    /// `to` is not a successor of `from`.
    #[error("Illegal transition from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The order is delivered or cancelled and can no longer change.
    #[error("Order is closed ({status})")]
    OrderClosed { status: OrderStatus },

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The inventory ledger failed for a reason other than stock.
    #[error("Inventory error: {0}")]
    Inventory(InventoryError),

    /// The promo engine failed for a reason other than a rejection.
    #[error("Promo error: {0}")]
    Promo(PromoError),

    #[error(transparent)]
    Framework(FrameworkError),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyOrder
            | OrderError::InvalidQuantity { .. }
            | OrderError::InvalidPrice { .. } => ErrorKind::Validation,
            OrderError::PromoRejected(_)
            | OrderError::InsufficientStock { .. }
            | OrderError::IllegalTransition { .. }
            | OrderError::OrderClosed { .. } => ErrorKind::BusinessRule,
            OrderError::DishNotFound(_) | OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::Inventory(e) => e.kind(),
            OrderError::Promo(e) => e.kind(),
            OrderError::Framework(e) => framework_kind(e),
        }
    }
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::Framework(other),
        }
    }
}

impl From<InventoryError> for OrderError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::InsufficientStock { dish_id, .. } => {
                OrderError::InsufficientStock { dish_id }
            }
            other => OrderError::Inventory(other),
        }
    }
}

impl From<PromoError> for OrderError {
    fn from(e: PromoError) -> Self {
        match e {
            PromoError::Rejected(reason) => OrderError::PromoRejected(reason),
            other => OrderError::Promo(other),
        }
    }
}
