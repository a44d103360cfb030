//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the core component that manages the lifecycle
//! and state of entities. It implements the "Server" side of the Actor Model, processing
//! messages sequentially and ensuring exclusive access to the entity store.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Filter, ResourceRequest};
use crate::store::Store;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Generates the id for a new entity from its creation payload.
pub type IdGenerator<T> =
    Box<dyn Fn(&<T as ActorEntity>::Create) -> <T as ActorEntity>::Id + Send + Sync>;

/// The generic actor that manages a collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the committed state (`store`), the
/// persistence port (`persistence`), and the receiver end of the channel.
///
/// **Concurrency Model**:
/// Each `ResourceActor` processes its own messages *sequentially* in a loop, so every request
/// is a single-writer critical section over the whole collection. Two transitions on the same
/// order, or two reservations on the same dish, can never interleave. No `Mutex` is needed for
/// the `store`.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// # Operations
///
/// * **Create**: id from the generator, `from_create_params`, `on_create`, persist, insert,
///   `after_create` (rolled back with `on_create_aborted` if it fails).
/// * **Get / List**: clones from the committed store.
/// * **Update / Action**: run the hook on a clone, persist the clone, then replace the
///   committed entity. Actions then get `after_action`.
/// * **Delete**: `on_delete`, remove from the persistence port, then from memory.
/// * **Batch**: `handle_batch` over a read-only view, `put_many` of every changed record,
///   apply them in memory, then `after_batch`.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    persistence: Box<dyn Store<T>>,
    next_id: IdGenerator<T>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    /// * `persistence` - The store the collection is loaded from and written to.
    /// * `next_id` - Derives the id of a new entity from its creation payload.
    pub fn new(
        buffer_size: usize,
        persistence: impl Store<T>,
        next_id: impl Fn(&T::Create) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            persistence: Box::new(persistence),
            next_id: Box::new(next_id),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows entities
    /// to access external dependencies (like other clients) that were created *after*
    /// the actor was instantiated but *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "Order" instead of "fulfillment::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");

        match self.persistence.load_all() {
            Ok(items) => {
                for item in items {
                    self.store.insert(item.id().clone(), item);
                }
            }
            Err(e) => {
                error!(entity_type, error = %e, "Failed to load collection, actor not started");
                return;
            }
        }
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let result = self.create(params, &context).await;
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), size = self.store.len(), "Created")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self.list(&filter);
                    debug!(entity_type, matched = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id, &context).await;
                    match &result {
                        Ok(()) => info!(entity_type, %id, size = self.store.len(), "Deleted"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self.action(&id, action, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Batch { batch, respond_to } => {
                    debug!(entity_type, ?batch, "Batch");
                    let result = self.batch(batch, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, "Batch ok"),
                        Err(e) => warn!(entity_type, error = %e, "Batch failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(&mut self, params: T::Create, context: &T::Context) -> Result<T, T::Error> {
        let id = (self.next_id)(&params);
        if self.store.contains_key(&id) {
            return Err(FrameworkError::AlreadyExists(id.to_string()).into());
        }

        let mut item = T::from_create_params(id.clone(), params)?;
        item.on_create(&self.store, context).await?;

        if let Err(e) = self.persistence.put_many(std::slice::from_ref(&item)) {
            item.on_create_aborted(context).await;
            return Err(FrameworkError::from(e).into());
        }
        self.store.insert(id.clone(), item.clone());

        if let Err(e) = item.after_create(context).await {
            self.store.remove(&id);
            if let Err(store_err) = self.persistence.remove(&id) {
                error!(%id, error = %store_err, "Failed to remove entity after aborted create");
            }
            item.on_create_aborted(context).await;
            return Err(e);
        }
        Ok(item)
    }

    fn list(&self, filter: &Filter<T>) -> Vec<T> {
        let mut items: Vec<T> = self
            .store
            .values()
            .filter(|item| filter(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id().cmp(b.id()));
        items
    }

    async fn update(
        &mut self,
        id: &T::Id,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, T::Error> {
        let mut working = self.committed(id)?;
        working.on_update(update, context).await?;
        self.persistence
            .put_many(std::slice::from_ref(&working))
            .map_err(FrameworkError::from)?;
        self.store.insert(id.clone(), working.clone());
        Ok(working)
    }

    async fn delete(&mut self, id: &T::Id, context: &T::Context) -> Result<(), T::Error> {
        let item = self.committed(id)?;
        item.on_delete(context).await?;
        self.persistence.remove(id).map_err(FrameworkError::from)?;
        self.store.remove(id);
        Ok(())
    }

    async fn action(
        &mut self,
        id: &T::Id,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, T::Error> {
        let mut working = self.committed(id)?;
        let result = working.handle_action(action, context).await?;

        if let Err(e) = self.persistence.put_many(std::slice::from_ref(&working)) {
            working.on_action_aborted(&result, context).await;
            return Err(FrameworkError::from(e).into());
        }
        self.store.insert(id.clone(), working.clone());
        working.after_action(&result, context).await;
        Ok(result)
    }

    async fn batch(
        &mut self,
        batch: T::Batch,
        context: &T::Context,
    ) -> Result<T::BatchResult, T::Error> {
        let outcome = T::handle_batch(&self.store, batch, context).await?;
        if !outcome.changed.is_empty() {
            self.persistence
                .put_many(&outcome.changed)
                .map_err(FrameworkError::from)?;
            for item in outcome.changed {
                self.store.insert(item.id().clone(), item);
            }
        }
        T::after_batch(&outcome.result, context).await;
        Ok(outcome.result)
    }

    fn committed(&self, id: &T::Id) -> Result<T, T::Error> {
        self.store
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()).into())
    }
}
