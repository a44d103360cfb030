//! # Inventory Actor
//!
//! Daily stock per dish. One actor owns every [`InventoryRecord`], so reservations for the
//! same dish are serialized, and a multi-dish reservation is checked and written as one batch.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation and
//!   [`InventoryContext`]
//! - [`commands`] - [`InventoryCommand`] and [`InventoryReply`]
//! - [`error`] - [`InventoryError`]
//! - `ledger` - working copy used while a command runs, including the daily restock sweep
//!
//! Dishes never registered for tracking are always available and are skipped by
//! reservations.

pub mod commands;
pub mod entity;
pub mod error;
mod ledger;

pub use commands::*;
pub use entity::InventoryContext;
pub use error::*;

use crate::model::InventoryRecord;
use actor_framework::{ResourceActor, ResourceClient, Store};

/// Creates a new Inventory actor and its client.
pub fn new(
    buffer_size: usize,
    store: impl Store<InventoryRecord>,
) -> (ResourceActor<InventoryRecord>, ResourceClient<InventoryRecord>) {
    ResourceActor::new(buffer_size, store, |seed| seed.dish_id.clone())
}
