//! Working copy of the inventory collection used while a command runs.
//!
//! Records are cloned out of the committed collection on first touch, brought up to date
//! with the restock sweep, then mutated. [`Ledger::finish`] hands back only the records that
//! differ from their committed version.

use super::error::InventoryError;
use crate::model::{
    below_threshold, AlertKind, Availability, DishId, InventoryRecord, StockAlert, StockLine,
    DEFAULT_UNAVAILABLE_REASON, MAX_ALERTS_PER_DISH, SOLD_OUT_REASON, UNLIMITED_STOCK,
};
use crate::ports::Clock;
use actor_framework::Records;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub(crate) struct Ledger<'a> {
    committed: &'a Records<InventoryRecord>,
    working: BTreeMap<DishId, InventoryRecord>,
    alerts: Vec<StockAlert>,
    clock: &'a dyn Clock,
    now: DateTime<Utc>,
    low_stock_percent: u8,
}

/// Applies the once-a-day reset and lifts a hold whose end time has passed.
/// Returns true when `record` changed.
pub(crate) fn restock_if_due(record: &mut InventoryRecord, clock: &dyn Clock, now: DateTime<Utc>) -> bool {
    let mut changed = false;

    if record.unavailable_until.is_some_and(|until| until <= now) {
        record.unavailable_reason = None;
        record.unavailable_until = None;
        record.available = record.current_stock > 0;
        changed = true;
    }

    if record.auto_restock_enabled && clock.day_of(record.last_restocked_at) < clock.day_of(now) {
        record.current_stock = record.daily_limit.unwrap_or(UNLIMITED_STOCK);
        record.last_restocked_at = now;
        if !record.is_on_hold() {
            record.available = true;
        }
        changed = true;
    }

    if changed {
        record.updated_at = now;
    }
    changed
}

/// Sums quantities per dish. Zero quantities are rejected.
fn merge(lines: Vec<StockLine>) -> Result<BTreeMap<DishId, u32>, InventoryError> {
    let mut merged = BTreeMap::new();
    for line in lines {
        if line.quantity == 0 {
            return Err(InventoryError::InvalidQuantity {
                dish_id: line.dish_id,
                quantity: 0,
            });
        }
        let total: &mut u32 = merged.entry(line.dish_id).or_default();
        *total = total.saturating_add(line.quantity);
    }
    Ok(merged)
}

fn push_alert(
    record: &mut InventoryRecord,
    kind: AlertKind,
    now: DateTime<Utc>,
    raised: &mut Vec<StockAlert>,
) {
    let alert = StockAlert::for_record(record, kind, now);
    record.alerts.push(alert.clone());
    if record.alerts.len() > MAX_ALERTS_PER_DISH {
        let excess = record.alerts.len() - MAX_ALERTS_PER_DISH;
        record.alerts.drain(..excess);
    }
    raised.push(alert);
}

impl<'a> Ledger<'a> {
    pub(crate) fn new(
        committed: &'a Records<InventoryRecord>,
        clock: &'a dyn Clock,
        low_stock_percent: u8,
    ) -> Self {
        Self {
            committed,
            working: BTreeMap::new(),
            alerts: Vec::new(),
            clock,
            now: clock.now(),
            low_stock_percent,
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The up-to-date record for `dish_id`, if the dish is tracked.
    pub(crate) fn get(&mut self, dish_id: &DishId) -> Option<&mut InventoryRecord> {
        if !self.working.contains_key(dish_id) {
            let mut record = self.committed.get(dish_id)?.clone();
            restock_if_due(&mut record, self.clock, self.now);
            self.working.insert(dish_id.clone(), record);
        }
        self.working.get_mut(dish_id)
    }

    pub(crate) fn insert(&mut self, record: InventoryRecord) {
        self.working.insert(record.dish_id.clone(), record);
    }

    /// Snapshot of the current state of `dish_id` for replies.
    pub(crate) fn snapshot(&mut self, dish_id: &DishId) -> Result<InventoryRecord, InventoryError> {
        self.get(dish_id)
            .cloned()
            .ok_or_else(|| InventoryError::NotFound(dish_id.to_string()))
    }

    pub(crate) fn check(&mut self, dish_id: &DishId) -> Availability {
        let Some(record) = self.get(dish_id) else {
            return Availability {
                available: true,
                stock_remaining: None,
                reason: None,
            };
        };
        if !record.available {
            let reason = record.unavailable_reason.clone().unwrap_or_else(|| {
                if record.current_stock == 0 {
                    SOLD_OUT_REASON.to_string()
                } else {
                    DEFAULT_UNAVAILABLE_REASON.to_string()
                }
            });
            return Availability {
                available: false,
                stock_remaining: Some(record.current_stock),
                reason: Some(reason),
            };
        }
        if record.current_stock == 0 {
            return Availability {
                available: false,
                stock_remaining: Some(0),
                reason: Some(SOLD_OUT_REASON.to_string()),
            };
        }
        Availability {
            available: true,
            stock_remaining: Some(record.current_stock),
            reason: None,
        }
    }

    /// All-or-nothing decrement. Every line is checked before any record is touched.
    pub(crate) fn reserve(&mut self, lines: Vec<StockLine>) -> Result<(), InventoryError> {
        let merged = merge(lines)?;

        for (dish_id, &requested) in &merged {
            if let Some(record) = self.get(dish_id) {
                let available = record.reservable();
                if available < requested {
                    return Err(InventoryError::InsufficientStock {
                        dish_id: dish_id.clone(),
                        requested,
                        available,
                    });
                }
            }
        }

        let now = self.now;
        let percent = self.low_stock_percent;
        for (dish_id, quantity) in merged {
            let Some(record) = self.working.get_mut(&dish_id) else {
                continue;
            };
            let before = record.current_stock;
            record.current_stock = before - quantity;
            record.updated_at = now;

            if record.current_stock == 0 {
                record.available = false;
                push_alert(record, AlertKind::OutOfStock, now, &mut self.alerts);
            } else if let Some(limit) = record.daily_limit {
                if !below_threshold(before, limit, percent)
                    && below_threshold(record.current_stock, limit, percent)
                {
                    push_alert(record, AlertKind::LowStock, now, &mut self.alerts);
                }
            }
        }
        Ok(())
    }

    /// Gives quantities back, never past the daily limit. A dish that was out only because
    /// it ran dry becomes available again; a preparer's hold stays.
    pub(crate) fn restore(&mut self, lines: Vec<StockLine>) -> Result<(), InventoryError> {
        let merged = merge(lines)?;
        let now = self.now;
        for (dish_id, quantity) in merged {
            if self.get(&dish_id).is_none() {
                continue;
            }
            let Some(record) = self.working.get_mut(&dish_id) else {
                continue;
            };
            let restored = record.current_stock.saturating_add(quantity);
            record.current_stock = record.daily_limit.map_or(restored, |limit| restored.min(limit));
            record.updated_at = now;

            if !record.available && !record.is_on_hold() && record.current_stock > 0 {
                record.available = true;
                push_alert(record, AlertKind::BackInStock, now, &mut self.alerts);
            }
        }
        Ok(())
    }

    pub(crate) fn sweep(&mut self) {
        let mut ids: Vec<DishId> = self.committed.keys().cloned().collect();
        ids.sort();
        for id in ids {
            self.get(&id);
        }
    }

    pub(crate) fn set_availability(
        &mut self,
        dish_id: &DishId,
        available: bool,
        reason: Option<String>,
        until: Option<DateTime<Utc>>,
    ) {
        let now = self.now;
        if self.get(dish_id).is_none() {
            self.insert(InventoryRecord {
                dish_id: dish_id.clone(),
                preparer_id: None,
                available: true,
                daily_limit: None,
                current_stock: 0,
                last_restocked_at: now,
                auto_restock_enabled: false,
                unavailable_reason: None,
                unavailable_until: None,
                updated_at: now,
                alerts: Vec::new(),
            });
        }
        let Some(record) = self.working.get_mut(dish_id) else {
            return;
        };

        if available {
            let was_out = !record.available;
            record.available = true;
            record.unavailable_reason = None;
            record.unavailable_until = None;
            if was_out && record.current_stock > 0 {
                push_alert(record, AlertKind::BackInStock, now, &mut self.alerts);
            }
        } else {
            record.available = false;
            record.unavailable_reason =
                Some(reason.unwrap_or_else(|| DEFAULT_UNAVAILABLE_REASON.to_string()));
            record.unavailable_until = until;
        }
        record.updated_at = now;
    }

    pub(crate) fn set_daily_stock(
        &mut self,
        dish_id: &DishId,
        daily_limit: u32,
        current_stock: Option<u32>,
    ) -> Result<(), InventoryError> {
        let stock = current_stock.unwrap_or(daily_limit);
        if stock > daily_limit {
            return Err(InventoryError::InvalidQuantity {
                dish_id: dish_id.clone(),
                quantity: stock,
            });
        }
        let now = self.now;
        if self.get(dish_id).is_none() {
            self.insert(InventoryRecord {
                dish_id: dish_id.clone(),
                preparer_id: None,
                available: stock > 0,
                daily_limit: None,
                current_stock: 0,
                last_restocked_at: now,
                auto_restock_enabled: true,
                unavailable_reason: None,
                unavailable_until: None,
                updated_at: now,
                alerts: Vec::new(),
            });
        }
        let Some(record) = self.working.get_mut(dish_id) else {
            return Ok(());
        };
        record.daily_limit = Some(daily_limit);
        self.restock_to(dish_id, stock);
        Ok(())
    }

    pub(crate) fn restock(&mut self, dish_id: &DishId, quantity: u32) -> Result<(), InventoryError> {
        let record = self
            .get(dish_id)
            .ok_or_else(|| InventoryError::NotFound(dish_id.to_string()))?;
        if record.daily_limit.is_some_and(|limit| quantity > limit) {
            return Err(InventoryError::InvalidQuantity {
                dish_id: dish_id.clone(),
                quantity,
            });
        }
        self.restock_to(dish_id, quantity);
        Ok(())
    }

    fn restock_to(&mut self, dish_id: &DishId, stock: u32) {
        let now = self.now;
        let Some(record) = self.working.get_mut(dish_id) else {
            return;
        };
        let was_depleted = !record.available && !record.is_on_hold();
        record.current_stock = stock;
        record.last_restocked_at = now;
        record.updated_at = now;
        if !record.is_on_hold() {
            record.available = stock > 0;
        }
        if was_depleted && record.available {
            push_alert(record, AlertKind::BackInStock, now, &mut self.alerts);
        }
    }

    /// Records that differ from their committed version, and the alerts raised.
    pub(crate) fn finish(self) -> (Vec<InventoryRecord>, Vec<StockAlert>) {
        let committed = self.committed;
        let changed = self
            .working
            .into_values()
            .filter(|r| committed.get(&r.dish_id) != Some(r))
            .collect();
        (changed, self.alerts)
    }
}
