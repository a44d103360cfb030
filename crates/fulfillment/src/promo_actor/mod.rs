//! # Promo Actor
//!
//! Owns every promo code together with its usage records.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`PromoCode`]
//! - [`error`] - [`PromoError`]
//! - [`actions`] - [`PromoAction`] (record a use) and [`PromoQuery`] (validate, list active)
//! - [`discount`] - eligibility checks and discount arithmetic
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use fulfillment::clients::PromoClient;
//! use fulfillment::ports::SystemClock;
//! use fulfillment::promo_actor::{self, PromoContext};
//! use actor_framework::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = promo_actor::new(32, MemoryStore::new());
//!     tokio::spawn(actor.run(PromoContext { clock: Arc::new(SystemClock) }));
//!     let promos = PromoClient::new(client);
//!     assert!(promos.active_promos().await.unwrap().is_empty());
//! }
//! ```

pub mod actions;
pub mod discount;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::PromoContext;
pub use error::*;

use crate::model::{PromoCode, PromoId};
use actor_framework::{ResourceActor, ResourceClient, Store};

/// Creates a new Promo actor and its client.
pub fn new(
    buffer_size: usize,
    store: impl Store<PromoCode>,
) -> (ResourceActor<PromoCode>, ResourceClient<PromoCode>) {
    ResourceActor::new(buffer_size, store, |_| PromoId::new())
}
