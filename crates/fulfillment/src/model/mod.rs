//! # Domain Model
//!
//! Plain data types shared by the actors, the clients and the collaborator ports.
//! Entities ([`Order`], [`InventoryRecord`], [`PromoCode`]) implement
//! [`ActorEntity`](actor_framework::ActorEntity) in their actor modules.

pub mod ids;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod promo;

pub use ids::*;
pub use inventory::*;
pub use notification::*;
pub use order::*;
pub use promo::*;

/// Menu item as described by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub price: Amount,
    pub category: String,
}
