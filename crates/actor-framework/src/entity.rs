//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract that every resource (Order, InventoryRecord,
//! PromoCode, …) must implement to be managed by the generic `ResourceActor`. It specifies
//! associated types for IDs, DTOs, actions, batch commands, context, and errors, and provides
//! lifecycle hooks around every state change.
//!
//! # Architecture Note
//! By defining a contract (`ActorEntity`) that all resource types must satisfy, we write the
//! `ResourceActor` logic *once* and reuse it everywhere. Associated types keep payloads apart:
//! an `Order` requires an `OrderCreate`, and the compiler rejects anything else.
//!
//! # Commit Model
//! Hooks that can fail (`on_create`, `on_update`, `handle_action`, `handle_batch`) never touch
//! the actor's committed state directly. They work on a fresh entity, a clone, or a read-only
//! view of the collection; the actor writes the result to its [`Store`](crate::Store) and only
//! then swaps it into memory. A failed hook or a failed write leaves prior state untouched.
//!
//! Hooks that run *after* a commit (`after_create`, `after_action`, `after_batch`) are the place
//! for side effects such as notifications.
//!
//! # Provided Methods (Hooks)
//! Everything except `from_create_params`, `on_update`, `handle_action` and `handle_batch` has a
//! no-op default.

use crate::error::FrameworkError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Read-only view of an actor's committed collection.
pub type Records<T> = HashMap<<T as ActorEntity>::Id, T>;

/// Result of a collection-level batch command.
///
/// `changed` holds every record the command creates or modifies. The actor persists all of
/// them in one `put_many` call before any becomes visible.
#[derive(Debug)]
pub struct BatchOutcome<T: ActorEntity> {
    pub changed: Vec<T>,
    pub result: T::BatchResult,
}

impl<T: ActorEntity> BatchOutcome<T> {
    pub fn new(changed: Vec<T>, result: T::BatchResult) -> Self {
        Self { changed, result }
    }

    /// An outcome that mutates nothing.
    pub fn read_only(result: T::BatchResult) -> Self {
        Self {
            changed: Vec::new(),
            result,
        }
    }
}

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks (e.g., calling other
/// actors). It also defines a `Context` type, which is injected into every hook. This allows
/// "Late Binding" of dependencies (passing clients to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance (DTO - Data Transfer Object).
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing operations on a single entity (e.g., `Transition`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Enum representing operations spanning several entities at once (e.g., `Reserve`).
    /// Use `std::convert::Infallible` when the entity has none.
    type Batch: Send + Sync + Debug;

    /// The result type returned by batch commands.
    type BatchResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// # Design Note: Error Granularity
    ///
    /// The framework enforces a **Per-Actor Error Type** (one enum for the whole actor) rather
    /// than **Per-Message Error Types**. Clients deal with a single `OrderError`, which keeps
    /// pattern matching simple at the cost of some precision.
    type Error: std::error::Error + From<FrameworkError> + Send + Sync + 'static;

    /// The entity's own identifier.
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is persisted.
    /// `records` is the committed collection, for uniqueness checks and lookups.
    async fn on_create(
        &mut self,
        _records: &Records<Self>,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once the entity is persisted and visible. An error here removes the entity
    /// again and triggers `on_create_aborted`.
    async fn after_create(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Compensation for side effects of `on_create` when the entity could not be committed.
    async fn on_create_aborted(&self, _ctx: &Self::Context) {}

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handlers (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Called after an action's new state has been committed.
    async fn after_action(&self, _result: &Self::ActionResult, _ctx: &Self::Context) {}

    /// Compensation for side effects of `handle_action` when the new state could not be
    /// committed. `self` is the rejected state.
    async fn on_action_aborted(&self, _result: &Self::ActionResult, _ctx: &Self::Context) {}

    /// Handle a collection-level command. Return every record to create or modify; nothing is
    /// written unless this returns `Ok`.
    async fn handle_batch(
        records: &Records<Self>,
        batch: Self::Batch,
        _ctx: &Self::Context,
    ) -> Result<BatchOutcome<Self>, Self::Error>;

    /// Called after a batch command's changes have been committed.
    async fn after_batch(_result: &Self::BatchResult, _ctx: &Self::Context) {}
}
