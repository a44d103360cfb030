//! # Order Client
//!
//! Provides a high‑level API for interacting with the `Order` actor.
//! Checkout orchestration (pricing, promo, stock) happens inside the actor's `on_create` hook;
//! this client only shapes requests and replies.
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, UserId};
use crate::order_actor::{OrderAction, OrderError};
use actor_framework::{ActorClient, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }
}

impl OrderClient {
    #[instrument(skip(self, params), fields(customer = %params.customer.id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        info!(lines = params.items.len(), "Sending create_order to actor");
        self.inner.create(params).await
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        Ok(self.inner.perform_action(id, action).await?.order)
    }

    /// Moves the order to `target`; fails with `IllegalTransition` unless `target` is a
    /// successor of the current status.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: OrderId,
        target: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.act(id, OrderAction::Transition { target, note }).await
    }

    /// Cancels a pending or confirmed order and gives its stock back.
    pub async fn cancel_order(&self, id: OrderId, reason: Option<String>) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Cancelled, reason).await
    }

    #[instrument(skip(self))]
    pub async fn assign_preparer(&self, id: OrderId, preparer_id: UserId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::AssignPreparer(preparer_id)).await
    }

    #[instrument(skip(self))]
    pub async fn assign_courier(&self, id: OrderId, courier_id: UserId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::AssignCourier(courier_id)).await
    }

    #[instrument(skip(self))]
    pub async fn update_notes(&self, id: OrderId, notes: String) -> Result<Order, OrderError> {
        self.inner
            .update(id, OrderUpdate { notes: Some(notes) })
            .await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.fetch(id).await
    }

    pub async fn get_order_by_number(&self, order_number: &str) -> Result<Option<Order>, OrderError> {
        let number = order_number.to_string();
        let mut found = self
            .inner
            .list(move |o: &Order| o.order_number == number)
            .await?;
        Ok(found.pop())
    }

    /// Newest first.
    pub async fn orders_for_customer(&self, customer_id: UserId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .inner
            .list(move |o: &Order| o.customer.id == customer_id)
            .await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Oldest first, the order a kitchen works through them.
    pub async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.inner.list(move |o: &Order| o.status == status).await?;
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    /// True when the customer has no delivered order yet.
    pub async fn is_first_order(&self, customer_id: UserId) -> Result<bool, OrderError> {
        let delivered = self
            .inner
            .list(move |o: &Order| o.customer.id == customer_id && o.status == OrderStatus::Delivered)
            .await?;
        Ok(delivered.is_empty())
    }
}
