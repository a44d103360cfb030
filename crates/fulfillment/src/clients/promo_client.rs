//! # Promo Client
//!
//! Provides a high‑level API for interacting with the `PromoCode` actor.
use crate::model::{
    normalize_code, PromoCode, PromoCreate, PromoId, PromoUpdate, PromoUsage, UsageRecord,
    UserId, ValidatedPromo, ValidationRequest,
};
use crate::promo_actor::{PromoAction, PromoError, PromoQuery, PromoReply};
use actor_framework::{ActorClient, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Promo actor.
#[derive(Clone)]
pub struct PromoClient {
    inner: ResourceClient<PromoCode>,
}

impl PromoClient {
    pub fn new(inner: ResourceClient<PromoCode>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<PromoCode> for PromoClient {
    fn inner(&self) -> &ResourceClient<PromoCode> {
        &self.inner
    }
}

impl PromoClient {
    /// Runs every eligibility check for `request.code` and returns the discount it grants.
    /// Read-only: nothing is counted until [`record_usage`](Self::record_usage).
    #[instrument(skip(self))]
    pub async fn validate(&self, request: ValidationRequest) -> Result<ValidatedPromo, PromoError> {
        debug!("Sending request");
        match self.inner.batch(PromoQuery::Validate(request)).await? {
            PromoReply::Validated(validated) => Ok(validated),
            PromoReply::Active(_) => unreachable!("Validate must return Validated"),
        }
    }

    /// Counts one use of the promo by `usage.order_id`. Calling it again for the same order
    /// returns the first record.
    #[instrument(skip(self))]
    pub async fn record_usage(&self, promo_id: PromoId, usage: UsageRecord) -> Result<PromoUsage, PromoError> {
        debug!("Sending request");
        self.inner
            .perform_action(promo_id, PromoAction::RecordUsage(usage))
            .await
    }

    #[instrument(skip(self))]
    pub async fn create_promo(&self, params: PromoCreate) -> Result<PromoCode, PromoError> {
        debug!("Sending request");
        self.inner.create(params).await
    }

    #[instrument(skip(self))]
    pub async fn update_promo(&self, id: PromoId, update: PromoUpdate) -> Result<PromoCode, PromoError> {
        debug!("Sending request");
        self.inner.update(id, update).await
    }

    pub async fn deactivate_promo(&self, id: PromoId) -> Result<PromoCode, PromoError> {
        let update = PromoUpdate {
            active: Some(false),
            ..PromoUpdate::default()
        };
        self.update_promo(id, update).await
    }

    /// Promos active and inside their validity window, ordered by code.
    #[instrument(skip(self))]
    pub async fn active_promos(&self) -> Result<Vec<PromoCode>, PromoError> {
        match self.inner.batch(PromoQuery::Active).await? {
            PromoReply::Active(promos) => Ok(promos),
            PromoReply::Validated(_) => unreachable!("Active must return Active"),
        }
    }

    /// Case-insensitive lookup.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, PromoError> {
        let code = normalize_code(code);
        let mut found = self.inner.list(move |p: &PromoCode| p.code == code).await?;
        Ok(found.pop())
    }

    /// Every promo use by `user_id`, newest first.
    #[instrument(skip(self))]
    pub async fn usages_for_user(&self, user_id: UserId) -> Result<Vec<PromoUsage>, PromoError> {
        let filter_id = user_id.clone();
        let promos = self
            .inner
            .list(move |p: &PromoCode| p.uses_by(&filter_id) > 0)
            .await?;
        let mut usages: Vec<PromoUsage> = promos
            .into_iter()
            .flat_map(|p| p.usages)
            .filter(|u| u.user_id == user_id)
            .collect();
        usages.sort_by(|a, b| b.used_at.cmp(&a.used_at));
        Ok(usages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, PromoRejection};
    use actor_framework::mock::{create_mock_client, expect_action, expect_batch};

    #[tokio::test]
    async fn test_validate_surfaces_rejection() {
        let (client, mut receiver) = create_mock_client::<PromoCode>(10);
        let promo_client = PromoClient::new(client);

        let task = tokio::spawn(async move {
            promo_client
                .validate(ValidationRequest {
                    code: "bienvenue10".into(),
                    user_id: UserId::from("u1"),
                    subtotal: 500,
                    is_first_order: true,
                    lines: Vec::new(),
                })
                .await
        });

        let (query, responder) = expect_batch(&mut receiver)
            .await
            .expect("Expected Batch request");
        match query {
            PromoQuery::Validate(request) => assert_eq!(request.subtotal, 500),
            other => panic!("Expected Validate, got {other:?}"),
        }
        responder
            .send(Err(PromoError::Rejected(PromoRejection::BelowMinimum)))
            .unwrap();

        let result = task.await.unwrap();
        assert_eq!(result, Err(PromoError::Rejected(PromoRejection::BelowMinimum)));
    }

    #[tokio::test]
    async fn test_record_usage_targets_promo() {
        let (client, mut receiver) = create_mock_client::<PromoCode>(10);
        let promo_client = PromoClient::new(client);
        let promo_id = PromoId::new();
        let order_id = OrderId::new();

        let task = tokio::spawn(async move {
            promo_client
                .record_usage(
                    promo_id,
                    UsageRecord {
                        user_id: UserId::from("u1"),
                        order_id,
                        discount_applied: 400,
                    },
                )
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, promo_id);
        let PromoAction::RecordUsage(usage) = action;
        assert_eq!(usage.order_id, order_id);
        drop(responder);

        let result = task.await.unwrap();
        assert!(matches!(result, Err(PromoError::Framework(_))));
    }
}
