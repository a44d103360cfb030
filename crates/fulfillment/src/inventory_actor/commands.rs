//! Batch commands for the Inventory actor.
//!
//! Every stock movement goes through a batch so that a reservation spanning several dishes
//! is checked and written as a unit.

use crate::model::{Availability, DishId, InventoryRecord, StockAlert, StockLine, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum InventoryCommand {
    /// Availability of one dish. Untracked dishes are always available.
    Check { dish_id: DishId },
    /// Decrement every line, or none if any line falls short.
    Reserve { lines: Vec<StockLine> },
    /// Give reserved quantities back.
    Restore { lines: Vec<StockLine> },
    /// Reset every auto-restocking dish not yet restocked today.
    Sweep,
    /// Start tracking a dish. Returns the existing record when already tracked.
    Initialize {
        dish_id: DishId,
        preparer_id: Option<UserId>,
        daily_limit: Option<u32>,
    },
    /// Preparer toggle. `reason` and `until` only apply when pulling the dish.
    SetAvailability {
        dish_id: DishId,
        available: bool,
        reason: Option<String>,
        until: Option<DateTime<Utc>>,
    },
    /// New daily limit; `current_stock` defaults to the limit.
    SetDailyStock {
        dish_id: DishId,
        daily_limit: u32,
        current_stock: Option<u32>,
    },
    /// Set the current stock of a tracked dish.
    Restock { dish_id: DishId, quantity: u32 },
}

#[derive(Debug, Clone)]
pub enum InventoryResult {
    Availability(Availability),
    /// The record a single-dish command ended with.
    Record(InventoryRecord),
    /// Records written by a multi-dish command, sorted by dish id.
    Changed(Vec<InventoryRecord>),
}

/// Result of an [`InventoryCommand`] with the alerts it raised.
#[derive(Debug, Clone)]
pub struct InventoryReply {
    pub result: InventoryResult,
    pub alerts: Vec<StockAlert>,
}

impl InventoryReply {
    pub fn new(result: InventoryResult) -> Self {
        Self {
            result,
            alerts: Vec::new(),
        }
    }
}
