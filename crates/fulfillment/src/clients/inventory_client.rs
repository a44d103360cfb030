//! # Inventory Client
//!
//! Provides a high‑level API for interacting with the `InventoryRecord` actor: availability,
//! reservations, the daily sweep, preparer controls and dashboard queries.
use crate::inventory_actor::{InventoryCommand, InventoryError, InventoryResult};
use crate::model::{
    Availability, DishId, InventoryRecord, InventoryUpdate, StockAlert, StockLine, UserId,
};
use actor_framework::{ActorClient, ResourceClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Client for interacting with the Inventory actor.
#[derive(Clone)]
pub struct InventoryClient {
    inner: ResourceClient<InventoryRecord>,
    low_stock_percent: u8,
}

impl InventoryClient {
    pub fn new(inner: ResourceClient<InventoryRecord>) -> Self {
        Self {
            inner,
            low_stock_percent: 20,
        }
    }

    /// Threshold used by [`low_stock_dishes`](Self::low_stock_dishes).
    pub fn with_low_stock_percent(mut self, percent: u8) -> Self {
        self.low_stock_percent = percent;
        self
    }
}

#[async_trait]
impl ActorClient<InventoryRecord> for InventoryClient {
    fn inner(&self) -> &ResourceClient<InventoryRecord> {
        &self.inner
    }
}

impl InventoryClient {
    async fn record(&self, command: InventoryCommand) -> Result<InventoryRecord, InventoryError> {
        match self.inner.batch(command).await?.result {
            InventoryResult::Record(record) => Ok(record),
            other => unreachable!("single-dish command returned {other:?}"),
        }
    }

    async fn changed(&self, command: InventoryCommand) -> Result<Vec<InventoryRecord>, InventoryError> {
        match self.inner.batch(command).await?.result {
            InventoryResult::Changed(records) => Ok(records),
            other => unreachable!("multi-dish command returned {other:?}"),
        }
    }

    #[instrument(skip(self))]
    pub async fn check_availability(&self, dish_id: DishId) -> Result<Availability, InventoryError> {
        debug!("Sending request");
        match self.inner.batch(InventoryCommand::Check { dish_id }).await?.result {
            InventoryResult::Availability(availability) => Ok(availability),
            other => unreachable!("Check returned {other:?}"),
        }
    }

    /// Decrements every line or none. Returns the records that changed.
    #[instrument(skip(self))]
    pub async fn reserve(&self, lines: Vec<StockLine>) -> Result<Vec<InventoryRecord>, InventoryError> {
        debug!("Sending request");
        self.changed(InventoryCommand::Reserve { lines }).await
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, lines: Vec<StockLine>) -> Result<Vec<InventoryRecord>, InventoryError> {
        debug!("Sending request");
        self.changed(InventoryCommand::Restore { lines }).await
    }

    /// Restocks dishes not yet restocked today. A second call on the same day changes nothing.
    #[instrument(skip(self))]
    pub async fn daily_restock_sweep(&self) -> Result<Vec<InventoryRecord>, InventoryError> {
        self.changed(InventoryCommand::Sweep).await
    }

    #[instrument(skip(self))]
    pub async fn initialize_dish(
        &self,
        dish_id: DishId,
        preparer_id: Option<UserId>,
        daily_limit: Option<u32>,
    ) -> Result<InventoryRecord, InventoryError> {
        self.record(InventoryCommand::Initialize {
            dish_id,
            preparer_id,
            daily_limit,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_availability(
        &self,
        dish_id: DishId,
        available: bool,
        reason: Option<String>,
        until: Option<DateTime<Utc>>,
    ) -> Result<InventoryRecord, InventoryError> {
        self.record(InventoryCommand::SetAvailability {
            dish_id,
            available,
            reason,
            until,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_daily_stock(
        &self,
        dish_id: DishId,
        daily_limit: u32,
        current_stock: Option<u32>,
    ) -> Result<InventoryRecord, InventoryError> {
        self.record(InventoryCommand::SetDailyStock {
            dish_id,
            daily_limit,
            current_stock,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, dish_id: DishId, quantity: u32) -> Result<InventoryRecord, InventoryError> {
        self.record(InventoryCommand::Restock { dish_id, quantity }).await
    }

    /// Changes the preparer or the auto-restock flag of a tracked dish.
    #[instrument(skip(self))]
    pub async fn configure_dish(
        &self,
        dish_id: DishId,
        update: InventoryUpdate,
    ) -> Result<InventoryRecord, InventoryError> {
        self.inner.update(dish_id, update).await
    }

    pub async fn inventory_for_preparer(&self, preparer_id: UserId) -> Result<Vec<InventoryRecord>, InventoryError> {
        self.inner
            .list(move |r: &InventoryRecord| r.preparer_id.as_ref() == Some(&preparer_id))
            .await
    }

    pub async fn low_stock_dishes(&self) -> Result<Vec<InventoryRecord>, InventoryError> {
        let percent = self.low_stock_percent;
        self.inner
            .list(move |r: &InventoryRecord| r.is_low_stock(percent))
            .await
    }

    pub async fn out_of_stock_dishes(&self) -> Result<Vec<InventoryRecord>, InventoryError> {
        self.inner.list(InventoryRecord::is_out_of_stock).await
    }

    /// Alert log, newest first, optionally for one preparer's dishes.
    #[instrument(skip(self))]
    pub async fn alerts(&self, preparer_id: Option<UserId>) -> Result<Vec<StockAlert>, InventoryError> {
        let records = match preparer_id {
            Some(preparer) => self.inventory_for_preparer(preparer).await?,
            None => self.list_all().await?,
        };
        let mut alerts: Vec<StockAlert> = records.into_iter().flat_map(|r| r.alerts).collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_actor::InventoryReply;
    use actor_framework::mock::{create_mock_client, expect_batch};

    #[tokio::test]
    async fn test_reserve_forwards_lines() {
        let (client, mut receiver) = create_mock_client::<InventoryRecord>(10);
        let inventory = InventoryClient::new(client);

        let task = tokio::spawn(async move {
            inventory
                .reserve(vec![StockLine {
                    dish_id: DishId::from("thieb"),
                    quantity: 2,
                }])
                .await
        });

        let (command, responder) = expect_batch(&mut receiver)
            .await
            .expect("Expected Batch request");
        match command {
            InventoryCommand::Reserve { lines } => assert_eq!(lines[0].quantity, 2),
            other => panic!("Expected Reserve, got {other:?}"),
        }
        responder
            .send(Err(InventoryError::InsufficientStock {
                dish_id: DishId::from("thieb"),
                requested: 2,
                available: 1,
            }))
            .unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(InventoryError::InsufficientStock { available: 1, .. })));
    }

    #[tokio::test]
    async fn test_check_availability_unwraps_reply() {
        let (client, mut receiver) = create_mock_client::<InventoryRecord>(10);
        let inventory = InventoryClient::new(client);

        let task = tokio::spawn(async move { inventory.check_availability(DishId::from("yassa")).await });

        let (_, responder) = expect_batch(&mut receiver)
            .await
            .expect("Expected Batch request");
        let availability = Availability {
            available: true,
            stock_remaining: None,
            reason: None,
        };
        responder
            .send(Ok(InventoryReply::new(InventoryResult::Availability(
                availability.clone(),
            ))))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap(), availability);
    }
}
