//! The order state machine as a `(from, to) -> effects` table.

use super::error::OrderError;
use crate::model::OrderStatus;
use serde::Serialize;

/// Side effect attached to a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Give the order's lines back to the inventory ledger.
    RestoreStock,
    /// Set `delivered_at`.
    StampDelivered,
    NotifyCustomer,
    /// Notify the assigned preparer, if any.
    NotifyPreparer,
    /// Notify the assigned courier, if any.
    NotifyCourier,
}

use Effect::*;
use OrderStatus::*;

const TRANSITIONS: &[(OrderStatus, OrderStatus, &[Effect])] = &[
    (Pending, Confirmed, &[NotifyCustomer]),
    (Pending, Cancelled, &[RestoreStock, NotifyCustomer]),
    (Confirmed, Preparing, &[NotifyCustomer, NotifyPreparer]),
    (Confirmed, Cancelled, &[RestoreStock, NotifyCustomer]),
    (Preparing, Ready, &[NotifyCustomer, NotifyCourier]),
    (Ready, Delivering, &[NotifyCustomer]),
    (Delivering, Delivered, &[StampDelivered, NotifyCustomer]),
];

/// Effects of moving from `from` to `to`, or `IllegalTransition` when `to` is not a
/// successor of `from`.
pub fn effects(from: OrderStatus, to: OrderStatus) -> Result<&'static [Effect], OrderError> {
    TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, effects)| *effects)
        .ok_or(OrderError::IllegalTransition { from, to })
}

/// Statuses reachable from `from` in one step.
pub fn successors(from: OrderStatus) -> Vec<OrderStatus> {
    TRANSITIONS
        .iter()
        .filter(|(f, _, _)| *f == from)
        .map(|(_, t, _)| *t)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_chain_successors_are_legal() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let legal = effects(from, to).is_ok();
                let expected = matches!(
                    (from, to),
                    (Pending, Confirmed)
                        | (Confirmed, Preparing)
                        | (Preparing, Ready)
                        | (Ready, Delivering)
                        | (Delivering, Delivered)
                        | (Pending, Cancelled)
                        | (Confirmed, Cancelled)
                );
                assert_eq!(legal, expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn terminal_states_have_no_successors() {
        assert!(successors(Delivered).is_empty());
        assert!(successors(Cancelled).is_empty());
        assert_eq!(successors(Pending), vec![Confirmed, Cancelled]);
    }

    #[test]
    fn cancellation_restores_stock() {
        assert!(effects(Confirmed, Cancelled).unwrap().contains(&RestoreStock));
        assert_eq!(
            effects(Pending, Delivered),
            Err(OrderError::IllegalTransition {
                from: Pending,
                to: Delivered
            })
        );
    }
}
