//! # Clients
//!
//! Typed facades over the generic [`ResourceClient`](actor_framework::ResourceClient) of each
//! actor. These are the operations collaborators (checkout, dashboards, admin) call.

pub mod inventory_client;
pub mod order_client;
pub mod promo_client;

pub use inventory_client::InventoryClient;
pub use order_client::OrderClient;
pub use promo_client::PromoClient;
