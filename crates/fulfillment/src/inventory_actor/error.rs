//! Error types for the Inventory actor.

use crate::error::{framework_kind, ErrorKind};
use crate::model::DishId;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// A line asked for more than the dish can supply. Nothing was reserved.
    #[error("Insufficient stock for {dish_id}: requested {requested}, available {available}")]
    InsufficientStock {
        dish_id: DishId,
        requested: u32,
        available: u32,
    },

    /// Zero quantities, or stock above the daily limit.
    #[error("Invalid quantity {quantity} for {dish_id}")]
    InvalidQuantity { dish_id: DishId, quantity: u32 },

    /// The dish is not tracked.
    #[error("Inventory record not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Framework(FrameworkError),
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::InsufficientStock { .. } => ErrorKind::BusinessRule,
            InventoryError::InvalidQuantity { .. } => ErrorKind::Validation,
            InventoryError::NotFound(_) => ErrorKind::NotFound,
            InventoryError::Framework(e) => framework_kind(e),
        }
    }
}

impl From<FrameworkError> for InventoryError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => InventoryError::NotFound(id),
            other => InventoryError::Framework(other),
        }
    }
}
