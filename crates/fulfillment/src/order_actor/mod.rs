//! # Order Actor
//!
//! Owns every [`Order`], its state machine and its status history, and orchestrates the
//! inventory and promo actors at checkout and cancellation.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation and
//!   [`OrderContext`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`] (transition, assignments) and [`OrderActionResult`]
//! - [`transitions`] - the `(from, to) -> effects` table
//!
//! ## Checkout
//!
//! ```text
//! create ─> from_create_params   items non-empty, quantities > 0
//!        ─> on_create            price lines, validate promo, reserve stock, totals
//!        ─> persist              status pending, one history entry
//!        ─> after_create         record promo usage
//!                                  └─ on failure: order removed, on_create_aborted restores stock
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod transitions;

pub use actions::*;
pub use entity::{is_first_order, OrderContext};
pub use error::*;
pub use transitions::Effect;

use crate::model::{Order, OrderId};
use actor_framework::{ResourceActor, ResourceClient, Store};

/// Creates a new Order actor and its client.
pub fn new(
    buffer_size: usize,
    store: impl Store<Order>,
) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size, store, |_| OrderId::new())
}
