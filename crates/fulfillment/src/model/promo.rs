use crate::model::{Amount, OrderId, PromoId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` is a percentage of the eligible subtotal.
    Percentage,
    /// `value` is a flat amount off the subtotal.
    Fixed,
    /// `value` is the delivery fee to waive.
    FreeDelivery,
}

/// A promotional code and its eligibility rules.
///
/// Usage records live inside the promo they belong to, so that counting a use and
/// appending its audit record are one write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub id: PromoId,
    /// Stored upper-case; lookups are case-insensitive.
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Amount,
    pub description: String,
    pub min_order_amount: Option<Amount>,
    pub max_discount: Option<Amount>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub per_user_limit: Option<u32>,
    pub first_order_only: bool,
    pub eligible_categories: Option<Vec<String>>,
    pub active: bool,
    #[serde(default)]
    pub usages: Vec<PromoUsage>,
}

impl PromoCode {
    pub fn matches_code(&self, code: &str) -> bool {
        self.code == normalize_code(code)
    }

    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }

    pub fn uses_by(&self, user_id: &UserId) -> u32 {
        let count = self.usages.iter().filter(|u| &u.user_id == user_id).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Audit record of one successful application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoUsage {
    pub user_id: UserId,
    pub promo_id: PromoId,
    pub code: String,
    pub order_id: OrderId,
    pub discount_applied: Amount,
    pub used_at: DateTime<Utc>,
}

/// Payload for creating a promo code. Also the shape of `[[promos]]` config entries.
#[derive(Debug, Clone, Deserialize)]
pub struct PromoCreate {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Amount,
    #[serde(default)]
    pub description: String,
    pub min_order_amount: Option<Amount>,
    pub max_discount: Option<Amount>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    #[serde(default)]
    pub first_order_only: bool,
    pub eligible_categories: Option<Vec<String>>,
}

/// Partial update; `None` leaves a field unchanged.
///
/// Optional constraints take a nested option: `Some(None)` removes the constraint.
#[derive(Debug, Clone, Default)]
pub struct PromoUpdate {
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub value: Option<Amount>,
    pub min_order_amount: Option<Option<Amount>>,
    pub max_discount: Option<Option<Amount>>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub usage_limit: Option<Option<u32>>,
    pub per_user_limit: Option<Option<u32>>,
    pub first_order_only: Option<bool>,
    pub eligible_categories: Option<Option<Vec<String>>>,
    pub active: Option<bool>,
}

/// Subtotal contributed by one catalog category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Amount,
}

/// Input of a promo validation.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub code: String,
    pub user_id: UserId,
    pub subtotal: Amount,
    pub is_first_order: bool,
    /// Breakdown of `subtotal` by category, consulted for category-restricted promos.
    pub lines: Vec<CategoryAmount>,
}

/// A promo that passed validation, with the discount it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPromo {
    pub promo: PromoCode,
    pub discount: Amount,
}

/// Usage to record once an order exists.
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub discount_applied: Amount,
}

/// Why a promo code was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoRejection {
    NotFound,
    Inactive,
    Expired,
    BelowMinimum,
    FirstOrderOnly,
    UsageLimitReached,
    PerUserLimitReached,
    NoEligibleItems,
}

impl Display for PromoRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PromoRejection::NotFound => "code not found",
            PromoRejection::Inactive => "code is no longer active",
            PromoRejection::Expired => "code is outside its validity period",
            PromoRejection::BelowMinimum => "order is below the minimum amount",
            PromoRejection::FirstOrderOnly => "code is reserved for a first order",
            PromoRejection::UsageLimitReached => "code has reached its usage limit",
            PromoRejection::PerUserLimitReached => "code already used the maximum number of times",
            PromoRejection::NoEligibleItems => "no item in the order is eligible",
        };
        f.write_str(text)
    }
}
