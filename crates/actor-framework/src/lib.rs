//! # Actor Framework
//!
//! This crate provides the foundational building blocks for creating type-safe, concurrent
//! actor systems in Rust. It implements a **Resource-Oriented Architecture (ROA)** pattern
//! on top of the **Actor Model**, providing a clean abstraction for managing stateful entities.
//!
//! ## Why ROA + Actor Model?
//!
//! ### Resource-Oriented Architecture (ROA)
//!
//! - Standard lifecycle operations (Create, Read, Update, Delete) on well-defined resources
//! - Predictable lifecycle management
//! - A uniform API surface across all resource types
//!
//! ### Actor Model
//!
//! - Isolated state (no shared memory, no locks)
//! - Message-passing concurrency
//! - Sequential processing within each actor eliminates race conditions
//!
//! ### The Synergy
//!
//! Each resource type (orders, inventory records, promo codes) gets its own actor with isolated
//! state. When resources need to interact (an order reserving stock), they talk through
//! **Action** and **Batch** messages instead of sharing data. An operation that must touch many
//! records of one collection at once, such as reserving several dishes, is a single `Batch`
//! message and is therefore applied all-or-nothing.
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model) - Foundational concurrency pattern by Carl Hewitt
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - Your business logic and domain models
//! 2. **Runtime Layer** ([`ResourceActor`]) - Message processing, concurrency and commits
//! 3. **Interface Layer** ([`ResourceClient`]) - Type-safe communication
//! 4. **Persistence Port** ([`Store`]) - Where committed state lives
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, BatchOutcome, FrameworkError, MemoryStore, Records, ResourceActor};
//! use async_trait::async_trait;
//! use std::convert::Infallible;
//!
//! #[derive(Clone, Debug)]
//! struct Dish {
//!     id: u32,
//!     stock: u32,
//! }
//!
//! #[derive(Debug)] struct DishCreate { id: u32, stock: u32 }
//! #[derive(Debug)] enum DishAction { Take(u32) }
//!
//! #[derive(Debug, thiserror::Error)]
//! enum DishError {
//!     #[error("Not enough stock")]
//!     Insufficient,
//!     #[error(transparent)]
//!     Framework(#[from] FrameworkError),
//! }
//!
//! #[async_trait]
//! impl ActorEntity for Dish {
//!     type Id = u32;
//!     type Create = DishCreate;
//!     type Update = u32;
//!     type Action = DishAction;
//!     type ActionResult = u32;
//!     type Batch = Infallible;
//!     type BatchResult = ();
//!     type Context = ();
//!     type Error = DishError;
//!
//!     fn id(&self) -> &u32 { &self.id }
//!
//!     fn from_create_params(id: u32, params: DishCreate) -> Result<Self, DishError> {
//!         Ok(Self { id, stock: params.stock })
//!     }
//!
//!     async fn on_update(&mut self, stock: u32, _ctx: &()) -> Result<(), DishError> {
//!         self.stock = stock;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: DishAction, _ctx: &()) -> Result<u32, DishError> {
//!         match action {
//!             DishAction::Take(n) if n <= self.stock => {
//!                 self.stock -= n;
//!                 Ok(self.stock)
//!             }
//!             DishAction::Take(_) => Err(DishError::Insufficient),
//!         }
//!     }
//!
//!     async fn handle_batch(_: &Records<Self>, b: Infallible, _: &()) -> Result<BatchOutcome<Self>, DishError> {
//!         match b {}
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Dish>::new(10, MemoryStore::new(), |p: &DishCreate| p.id);
//!     tokio::spawn(actor.run(()));
//!
//!     let dish = client.create(DishCreate { id: 7, stock: 2 }).await.unwrap();
//!     assert_eq!(client.perform_action(dish.id, DishAction::Take(2)).await.unwrap(), 0);
//!     assert!(matches!(
//!         client.perform_action(7, DishAction::Take(1)).await,
//!         Err(DishError::Insufficient)
//!     ));
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via the `run()` method, not at construction time.
//! All actors are created first, then each is started with the clients it needs. The order
//! actor, for example, runs with a context holding the inventory and promo clients.
//!
//! ## Error Handling
//!
//! Every entity names its own error enum, which must implement `From<FrameworkError>`. Clients
//! return that enum directly, so callers match on business failures and plumbing failures
//! (closed channel, timeout, storage) in one place.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockClient`](mock::MockClient), a real `ResourceClient<T>`
//! answered from scripted expectations, for testing an actor against mocked dependencies.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::{ActorEntity, BatchOutcome, Records};
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use store::{JsonFileStore, MemoryStore, Store, StoreError};
