//! Error types for the Promo actor.

use crate::error::{framework_kind, ErrorKind};
use crate::model::PromoRejection;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during promo operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PromoError {
    /// The code exists but cannot be applied to this order, or does not exist at all.
    #[error("Promo code rejected: {0}")]
    Rejected(PromoRejection),

    /// The promo definition itself is inconsistent (e.g. a 150% discount).
    #[error("Invalid promo definition: {0}")]
    InvalidPromo(String),

    /// Another promo already uses this code (case-insensitive).
    #[error("Promo code already exists: {0}")]
    DuplicateCode(String),

    /// The requested promo was not found.
    #[error("Promo not found: {0}")]
    NotFound(String),

    /// The actor could not be reached or could not persist.
    #[error(transparent)]
    Framework(FrameworkError),
}

impl PromoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PromoError::Rejected(_) | PromoError::DuplicateCode(_) => ErrorKind::BusinessRule,
            PromoError::InvalidPromo(_) => ErrorKind::Validation,
            PromoError::NotFound(_) => ErrorKind::NotFound,
            PromoError::Framework(e) => framework_kind(e),
        }
    }

    /// The rejection reason, when this is a rejection.
    pub fn rejection(&self) -> Option<PromoRejection> {
        match self {
            PromoError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<FrameworkError> for PromoError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => PromoError::NotFound(id),
            other => PromoError::Framework(other),
        }
    }
}
