use crate::model::{DishId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock given to dishes registered without a daily limit.
pub const UNLIMITED_STOCK: u32 = 999;

/// Reason recorded when a preparer pulls a dish without giving one.
pub const DEFAULT_UNAVAILABLE_REASON: &str = "Temporairement indisponible";

/// Reason reported for a tracked dish whose stock ran out.
pub const SOLD_OUT_REASON: &str = "Plus en stock aujourd'hui";

/// Most recent alerts kept per dish.
pub const MAX_ALERTS_PER_DISH: usize = 50;

/// Daily stock of one dish.
///
/// `unavailable_reason` is set only by an explicit preparer action and marks a hold that stock
/// movements never lift. Depletion alone flips `available` without a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub dish_id: DishId,
    pub preparer_id: Option<UserId>,
    pub available: bool,
    pub daily_limit: Option<u32>,
    pub current_stock: u32,
    pub last_restocked_at: DateTime<Utc>,
    pub auto_restock_enabled: bool,
    pub unavailable_reason: Option<String>,
    pub unavailable_until: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    /// Newest last.
    #[serde(default)]
    pub alerts: Vec<StockAlert>,
}

impl InventoryRecord {
    pub fn is_on_hold(&self) -> bool {
        self.unavailable_reason.is_some()
    }

    /// Units that can be reserved right now.
    pub fn reservable(&self) -> u32 {
        if self.available {
            self.current_stock
        } else {
            0
        }
    }

    /// True when stock sits at or under `percent` of the daily limit but is not exhausted.
    pub fn is_low_stock(&self, percent: u8) -> bool {
        match self.daily_limit {
            Some(limit) if self.current_stock > 0 => {
                below_threshold(self.current_stock, limit, percent)
            }
            _ => false,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.current_stock == 0 || !self.available
    }
}

pub(crate) fn below_threshold(stock: u32, limit: u32, percent: u8) -> bool {
    u64::from(stock) * 100 <= u64::from(limit) * u64::from(percent)
}

/// Everything needed to register a dish for stock tracking.
#[derive(Debug, Clone)]
pub struct InventorySeed {
    pub dish_id: DishId,
    pub preparer_id: Option<UserId>,
    pub daily_limit: Option<u32>,
    pub current_stock: u32,
    pub available: bool,
    pub auto_restock_enabled: bool,
    pub unavailable_reason: Option<String>,
    pub unavailable_until: Option<DateTime<Utc>>,
    pub at: DateTime<Utc>,
}

/// Settings a manager can change on an existing record.
#[derive(Debug, Clone, Default)]
pub struct InventoryUpdate {
    pub preparer_id: Option<UserId>,
    pub auto_restock_enabled: Option<bool>,
}

/// Quantity of one dish to reserve or give back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLine {
    pub dish_id: DishId,
    pub quantity: u32,
}

/// Answer to an availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub available: bool,
    /// `None` for dishes without stock tracking.
    pub stock_remaining: Option<u32>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowStock,
    OutOfStock,
    BackInStock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub id: Uuid,
    pub dish_id: DishId,
    pub preparer_id: Option<UserId>,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl StockAlert {
    pub(crate) fn for_record(record: &InventoryRecord, kind: AlertKind, at: DateTime<Utc>) -> Self {
        let message = match kind {
            AlertKind::LowStock => format!("Stock faible: {} restant(s)", record.current_stock),
            AlertKind::OutOfStock => "Rupture de stock".to_string(),
            AlertKind::BackInStock => "De nouveau en stock".to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            dish_id: record.dish_id.clone(),
            preparer_id: record.preparer_id.clone(),
            kind,
            message,
            created_at: at,
        }
    }
}
