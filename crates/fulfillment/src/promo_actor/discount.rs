//! Discount arithmetic and the eligibility checks behind validation.

use crate::model::{
    Amount, CategoryAmount, DiscountType, PromoCode, PromoRejection, ValidationRequest,
};
use chrono::{DateTime, Utc};

/// Discount granted by `promo` on `base`.
///
/// * percentage: `round(base * value / 100)`, capped at `max_discount`
/// * fixed: `value`
/// * free delivery: `value`, the fee to waive; the caller caps it at the actual fee
///
/// Percentage and fixed discounts never exceed `base`.
pub fn calculate_discount(promo: &PromoCode, base: Amount) -> Amount {
    let base = base.max(0);
    let raw = match promo.discount_type {
        DiscountType::Percentage => {
            let rounded = (base * promo.value + 50) / 100;
            promo.max_discount.map_or(rounded, |cap| rounded.min(cap))
        }
        DiscountType::Fixed => promo.value,
        DiscountType::FreeDelivery => return promo.value.max(0),
    };
    raw.clamp(0, base)
}

/// Amount the discount applies to. `None` when the promo is limited to categories and no
/// line belongs to one of them.
pub fn discount_base(promo: &PromoCode, subtotal: Amount, lines: &[CategoryAmount]) -> Option<Amount> {
    let Some(categories) = &promo.eligible_categories else {
        return Some(subtotal);
    };
    let eligible: Vec<&CategoryAmount> = lines
        .iter()
        .filter(|line| categories.iter().any(|c| c.eq_ignore_ascii_case(&line.category)))
        .collect();
    if eligible.is_empty() {
        return None;
    }
    Some(eligible.iter().map(|line| line.amount).sum())
}

/// Runs the eligibility checks in order, stopping at the first failure, and returns the
/// discount on success. The code lookup itself is the caller's job.
pub fn check(
    promo: &PromoCode,
    request: &ValidationRequest,
    now: DateTime<Utc>,
) -> Result<Amount, PromoRejection> {
    if !promo.active {
        return Err(PromoRejection::Inactive);
    }
    if !promo.is_within_window(now) {
        return Err(PromoRejection::Expired);
    }
    if promo.min_order_amount.is_some_and(|min| request.subtotal < min) {
        return Err(PromoRejection::BelowMinimum);
    }
    if promo.first_order_only && !request.is_first_order {
        return Err(PromoRejection::FirstOrderOnly);
    }
    if promo.usage_limit.is_some_and(|limit| promo.usage_count >= limit) {
        return Err(PromoRejection::UsageLimitReached);
    }
    if promo
        .per_user_limit
        .is_some_and(|limit| promo.uses_by(&request.user_id) >= limit)
    {
        return Err(PromoRejection::PerUserLimitReached);
    }
    let base = discount_base(promo, request.subtotal, &request.lines)
        .ok_or(PromoRejection::NoEligibleItems)?;
    Ok(calculate_discount(promo, base))
}
