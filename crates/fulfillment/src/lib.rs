//! # Order Fulfillment Core
//!
//! The part of a food-ordering storefront between checkout and delivery: promo codes, daily
//! dish stock, and the order state machine.
//!
//! ## Core Components
//!
//! - **[promo_actor]**: validates promo codes, computes discounts, records usage.
//! - **[inventory_actor]**: daily stock per dish with all-or-nothing reservations, restores,
//!   the daily restock sweep and stock alerts.
//! - **[order_actor]**: creates orders (pricing, promo, stock, totals) and drives them through
//!   `pending -> confirmed -> preparing -> ready -> delivering -> delivered`, or `cancelled`.
//! - **[clients]**: typed facades collaborators call.
//! - **[ports]**: catalog, delivery zones, notifications and clock, with simple adapters.
//! - **[lifecycle]**: [`FulfillmentSystem`](lifecycle::FulfillmentSystem) starts and wires
//!   everything.
//!
//! Each collection is owned by one actor from [`actor_framework`], which handles requests one
//! at a time. That single-writer loop is what keeps two orders from buying the last portion of
//! the same dish.
//!
//! ## Testing
//!
//! See [`actor_framework::mock`] for utilities to test one actor against mocked neighbours, and
//! [`ports::ManualClock`] for calendar-day behaviour.

pub mod clients;
pub mod config;
pub mod error;
pub mod inventory_actor;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod ports;
pub mod promo_actor;

pub use error::ErrorKind;
