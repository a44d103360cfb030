//! Custom actions for the Order actor.

use super::transitions::Effect;
use crate::model::{Order, OrderStatus, UserId};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Move to `target`. `note` replaces the default status message in the history.
    Transition {
        target: OrderStatus,
        note: Option<String>,
    },
    AssignPreparer(UserId),
    AssignCourier(UserId),
}

/// What an action changed.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Transitioned {
        from: OrderStatus,
        to: OrderStatus,
        effects: &'static [Effect],
    },
    PreparerAssigned(UserId),
    CourierAssigned(UserId),
}

/// The order as committed, and the change that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderActionResult {
    pub order: Order,
    pub change: OrderChange,
}
