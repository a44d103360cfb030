//! # Error Taxonomy
//!
//! Each actor has its own error enum ([`OrderError`](crate::order_actor::OrderError),
//! [`InventoryError`](crate::inventory_actor::InventoryError),
//! [`PromoError`](crate::promo_actor::PromoError)). All of them classify into one
//! [`ErrorKind`] so callers can decide how to present a failure without matching every variant.

use actor_framework::FrameworkError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input the caller should have prevented.
    Validation,
    /// A well-formed request refused by a business rule.
    BusinessRule,
    /// Unknown order, dish or promo.
    NotFound,
    /// Plumbing failure: closed actor, timeout, storage.
    Infrastructure,
}

/// Classification of framework failures that reach a domain error unchanged.
pub(crate) fn framework_kind(e: &FrameworkError) -> ErrorKind {
    match e {
        FrameworkError::NotFound(_) => ErrorKind::NotFound,
        FrameworkError::AlreadyExists(_) => ErrorKind::BusinessRule,
        _ => ErrorKind::Infrastructure,
    }
}
