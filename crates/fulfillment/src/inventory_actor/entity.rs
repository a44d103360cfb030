//! Entity trait implementation for the InventoryRecord domain type.
//!
//! Stock movements are batch commands run against a [`Ledger`]; see
//! [`InventoryCommand`] for the list. The actor has no per-record actions.

use super::commands::{InventoryCommand, InventoryReply, InventoryResult};
use super::error::InventoryError;
use super::ledger::Ledger;
use crate::model::{
    DishId, InventoryRecord, InventorySeed, InventoryUpdate, Notification, NotificationKind,
    StockAlert, UNLIMITED_STOCK,
};
use crate::ports::{emit_quietly, Clock, Notifier};
use actor_framework::{ActorEntity, BatchOutcome, Records};
use async_trait::async_trait;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info};

/// Dependencies of the inventory actor.
#[derive(Clone)]
pub struct InventoryContext {
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    /// Share of the daily limit under which a dish counts as low on stock.
    pub low_stock_percent: u8,
}

fn alert_notification(alert: &StockAlert) -> Option<Notification> {
    let preparer = alert.preparer_id.clone()?;
    Some(Notification {
        target_user_id: preparer,
        kind: NotificationKind::System,
        title: "Alerte stock".to_string(),
        message: format!("{}: {}", alert.dish_id.0, alert.message),
        link: Some("/chef-dashboard".to_string()),
        data: json!({
            "dish_id": alert.dish_id,
            "alert": alert.kind,
        }),
    })
}

#[async_trait]
impl ActorEntity for InventoryRecord {
    type Id = DishId;
    type Create = InventorySeed;
    type Update = InventoryUpdate;
    type Action = Infallible;
    type ActionResult = ();
    type Batch = InventoryCommand;
    type BatchResult = InventoryReply;
    type Context = InventoryContext;
    type Error = InventoryError;

    fn id(&self) -> &DishId {
        &self.dish_id
    }

    fn from_create_params(id: DishId, seed: InventorySeed) -> Result<Self, InventoryError> {
        if seed.daily_limit.is_some_and(|limit| seed.current_stock > limit) {
            return Err(InventoryError::InvalidQuantity {
                dish_id: id,
                quantity: seed.current_stock,
            });
        }
        Ok(Self {
            dish_id: id,
            preparer_id: seed.preparer_id,
            available: seed.available,
            daily_limit: seed.daily_limit,
            current_stock: seed.current_stock,
            last_restocked_at: seed.at,
            auto_restock_enabled: seed.auto_restock_enabled,
            unavailable_reason: seed.unavailable_reason,
            unavailable_until: seed.unavailable_until,
            updated_at: seed.at,
            alerts: Vec::new(),
        })
    }

    async fn on_update(
        &mut self,
        update: InventoryUpdate,
        ctx: &InventoryContext,
    ) -> Result<(), InventoryError> {
        if let Some(preparer) = update.preparer_id {
            self.preparer_id = Some(preparer);
        }
        if let Some(auto) = update.auto_restock_enabled {
            self.auto_restock_enabled = auto;
        }
        self.updated_at = ctx.clock.now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Infallible,
        _ctx: &InventoryContext,
    ) -> Result<(), InventoryError> {
        match action {}
    }

    async fn handle_batch(
        records: &Records<Self>,
        command: InventoryCommand,
        ctx: &InventoryContext,
    ) -> Result<BatchOutcome<Self>, InventoryError> {
        let mut ledger = Ledger::new(records, ctx.clock.as_ref(), ctx.low_stock_percent);

        let result = match command {
            InventoryCommand::Check { dish_id } => {
                InventoryResult::Availability(ledger.check(&dish_id))
            }
            InventoryCommand::Reserve { lines } => {
                ledger.reserve(lines)?;
                InventoryResult::Changed(Vec::new())
            }
            InventoryCommand::Restore { lines } => {
                ledger.restore(lines)?;
                InventoryResult::Changed(Vec::new())
            }
            InventoryCommand::Sweep => {
                ledger.sweep();
                InventoryResult::Changed(Vec::new())
            }
            InventoryCommand::Initialize {
                dish_id,
                preparer_id,
                daily_limit,
            } => {
                if ledger.get(&dish_id).is_none() {
                    let seed = InventorySeed {
                        dish_id: dish_id.clone(),
                        preparer_id,
                        daily_limit,
                        current_stock: daily_limit.unwrap_or(UNLIMITED_STOCK),
                        available: true,
                        auto_restock_enabled: true,
                        unavailable_reason: None,
                        unavailable_until: None,
                        at: ledger.now(),
                    };
                    ledger.insert(Self::from_create_params(dish_id.clone(), seed)?);
                    info!(%dish_id, ?daily_limit, "Dish registered for stock tracking");
                }
                InventoryResult::Record(ledger.snapshot(&dish_id)?)
            }
            InventoryCommand::SetAvailability {
                dish_id,
                available,
                reason,
                until,
            } => {
                ledger.set_availability(&dish_id, available, reason, until);
                InventoryResult::Record(ledger.snapshot(&dish_id)?)
            }
            InventoryCommand::SetDailyStock {
                dish_id,
                daily_limit,
                current_stock,
            } => {
                ledger.set_daily_stock(&dish_id, daily_limit, current_stock)?;
                InventoryResult::Record(ledger.snapshot(&dish_id)?)
            }
            InventoryCommand::Restock { dish_id, quantity } => {
                ledger.restock(&dish_id, quantity)?;
                InventoryResult::Record(ledger.snapshot(&dish_id)?)
            }
        };

        let (changed, alerts) = ledger.finish();
        let result = match result {
            InventoryResult::Changed(_) => InventoryResult::Changed(changed.clone()),
            other => other,
        };
        debug!(changed = changed.len(), alerts = alerts.len(), "Inventory command applied");
        Ok(BatchOutcome::new(changed, InventoryReply { result, alerts }))
    }

    async fn after_batch(reply: &InventoryReply, ctx: &InventoryContext) {
        for alert in &reply.alerts {
            match alert_notification(alert) {
                Some(notification) => emit_quietly(ctx.notifier.as_ref(), notification).await,
                None => info!(dish_id = %alert.dish_id, kind = ?alert.kind, "{}", alert.message),
            }
        }
    }
}
