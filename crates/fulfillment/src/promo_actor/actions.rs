//! Custom actions and batch commands for the Promo actor.

use crate::model::{PromoCode, UsageRecord, ValidatedPromo, ValidationRequest};

/// Operations on one promo code.
#[derive(Debug, Clone)]
pub enum PromoAction {
    /// Counts one use and appends its audit record. Idempotent per order id: recording the
    /// same order twice returns the first record and changes nothing.
    ///
    /// # Errors
    /// Fails with `UsageLimitReached` / `PerUserLimitReached` when the limits filled up since
    /// validation.
    RecordUsage(UsageRecord),
}

/// Read-only queries over the whole promo collection.
#[derive(Debug, Clone)]
pub enum PromoQuery {
    /// Looks the code up and runs every eligibility check.
    Validate(ValidationRequest),
    /// Promos that are active and inside their validity window right now.
    Active,
}

/// Results from [`PromoQuery`] - variants match 1:1.
#[derive(Debug, Clone)]
pub enum PromoReply {
    Validated(ValidatedPromo),
    Active(Vec<PromoCode>),
}
