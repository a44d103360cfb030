//! Entity trait implementation for the PromoCode domain type.
//!
//! Validation is a read-only batch query because it looks a promo up by code rather than by
//! id. Recording a use is an action on the promo itself, which makes the count and the audit
//! record one committed write.

use super::actions::{PromoAction, PromoQuery, PromoReply};
use super::discount;
use super::error::PromoError;
use crate::model::{
    normalize_code, DiscountType, PromoCode, PromoCreate, PromoId, PromoRejection, PromoUpdate,
    PromoUsage, UsageRecord, ValidatedPromo,
};
use crate::ports::Clock;
use actor_framework::{ActorEntity, BatchOutcome, Records};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Dependencies of the promo actor.
#[derive(Clone)]
pub struct PromoContext {
    pub clock: Arc<dyn Clock>,
}

fn check_definition(
    discount_type: DiscountType,
    value: i64,
    valid_from: chrono::DateTime<chrono::Utc>,
    valid_until: chrono::DateTime<chrono::Utc>,
) -> Result<(), PromoError> {
    if value <= 0 {
        return Err(PromoError::InvalidPromo("value must be positive".into()));
    }
    if discount_type == DiscountType::Percentage && value > 100 {
        return Err(PromoError::InvalidPromo(
            "percentage cannot exceed 100".into(),
        ));
    }
    if valid_from > valid_until {
        return Err(PromoError::InvalidPromo(
            "validity window ends before it starts".into(),
        ));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for PromoCode {
    type Id = PromoId;
    type Create = PromoCreate;
    type Update = PromoUpdate;
    type Action = PromoAction;
    type ActionResult = PromoUsage;
    type Batch = PromoQuery;
    type BatchResult = PromoReply;
    type Context = PromoContext;
    type Error = PromoError;

    fn id(&self) -> &PromoId {
        &self.id
    }

    fn from_create_params(id: PromoId, params: PromoCreate) -> Result<Self, PromoError> {
        let code = normalize_code(&params.code);
        if code.is_empty() {
            return Err(PromoError::InvalidPromo("code cannot be empty".into()));
        }
        check_definition(
            params.discount_type,
            params.value,
            params.valid_from,
            params.valid_until,
        )?;

        Ok(Self {
            id,
            code,
            discount_type: params.discount_type,
            value: params.value,
            description: params.description,
            min_order_amount: params.min_order_amount,
            max_discount: params.max_discount,
            valid_from: params.valid_from,
            valid_until: params.valid_until,
            usage_limit: params.usage_limit,
            usage_count: 0,
            per_user_limit: params.per_user_limit,
            first_order_only: params.first_order_only,
            eligible_categories: params.eligible_categories,
            active: true,
            usages: Vec::new(),
        })
    }

    async fn on_create(
        &mut self,
        records: &Records<Self>,
        _ctx: &PromoContext,
    ) -> Result<(), PromoError> {
        if records.values().any(|p| p.code == self.code) {
            return Err(PromoError::DuplicateCode(self.code.clone()));
        }
        Ok(())
    }

    async fn on_update(&mut self, update: PromoUpdate, _ctx: &PromoContext) -> Result<(), PromoError> {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(discount_type) = update.discount_type {
            self.discount_type = discount_type;
        }
        if let Some(value) = update.value {
            self.value = value;
        }
        if let Some(min) = update.min_order_amount {
            self.min_order_amount = min;
        }
        if let Some(max) = update.max_discount {
            self.max_discount = max;
        }
        if let Some(from) = update.valid_from {
            self.valid_from = from;
        }
        if let Some(until) = update.valid_until {
            self.valid_until = until;
        }
        if let Some(limit) = update.usage_limit {
            self.usage_limit = limit;
        }
        if let Some(limit) = update.per_user_limit {
            self.per_user_limit = limit;
        }
        if let Some(first_order_only) = update.first_order_only {
            self.first_order_only = first_order_only;
        }
        if let Some(categories) = update.eligible_categories {
            self.eligible_categories = categories;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        check_definition(self.discount_type, self.value, self.valid_from, self.valid_until)
    }

    /// Records a use.
    ///
    /// Limits are checked again because other orders may have consumed the promo between
    /// validation and this call.
    async fn handle_action(
        &mut self,
        action: PromoAction,
        ctx: &PromoContext,
    ) -> Result<PromoUsage, PromoError> {
        match action {
            PromoAction::RecordUsage(UsageRecord {
                user_id,
                order_id,
                discount_applied,
            }) => {
                if let Some(existing) = self.usages.iter().find(|u| u.order_id == order_id) {
                    debug!(code = %self.code, %order_id, "Usage already recorded");
                    return Ok(existing.clone());
                }
                if self.usage_limit.is_some_and(|limit| self.usage_count >= limit) {
                    return Err(PromoError::Rejected(PromoRejection::UsageLimitReached));
                }
                if self
                    .per_user_limit
                    .is_some_and(|limit| self.uses_by(&user_id) >= limit)
                {
                    return Err(PromoError::Rejected(PromoRejection::PerUserLimitReached));
                }

                let usage = PromoUsage {
                    user_id,
                    promo_id: self.id,
                    code: self.code.clone(),
                    order_id,
                    discount_applied,
                    used_at: ctx.clock.now(),
                };
                self.usage_count += 1;
                self.usages.push(usage.clone());
                info!(code = %self.code, count = self.usage_count, "Promo usage recorded");
                Ok(usage)
            }
        }
    }

    async fn handle_batch(
        records: &Records<Self>,
        query: PromoQuery,
        ctx: &PromoContext,
    ) -> Result<BatchOutcome<Self>, PromoError> {
        let now = ctx.clock.now();
        match query {
            PromoQuery::Validate(request) => {
                let promo = records
                    .values()
                    .find(|p| p.matches_code(&request.code))
                    .ok_or(PromoError::Rejected(PromoRejection::NotFound))?;
                let discount =
                    discount::check(promo, &request, now).map_err(PromoError::Rejected)?;
                debug!(code = %promo.code, discount, "Promo validated");
                Ok(BatchOutcome::read_only(PromoReply::Validated(ValidatedPromo {
                    promo: promo.clone(),
                    discount,
                })))
            }
            PromoQuery::Active => {
                let mut active: Vec<PromoCode> = records
                    .values()
                    .filter(|p| p.active && p.is_within_window(now))
                    .cloned()
                    .collect();
                active.sort_by(|a, b| a.code.cmp(&b.code));
                Ok(BatchOutcome::read_only(PromoReply::Active(active)))
            }
        }
    }
}
