//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

/// Predicate used by `List` requests.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Internal message type sent to the actor to request operations.
///
/// # Resource-Oriented Architecture
/// Instead of defining ad-hoc messages for every operation, we standardize around a set of
/// lifecycle operations that apply to almost any persistent resource:
///
/// - **Create**: Lifecycle start. Uses [`ActorEntity::Create`] to initialize a new resource.
/// - **Get / List (Read)**: Retrieval by ID, or every entity matching a predicate.
/// - **Update**: State mutation. Uses [`ActorEntity::Update`] to modify an existing resource.
/// - **Delete**: Lifecycle end. Removes the resource.
/// - **Action**: Executes a custom [`ActorEntity::Action`] on one resource.
/// - **Batch**: Executes a [`ActorEntity::Batch`] command that may touch many resources
///   atomically.
///
/// Every variant replies with the entity's own error type.
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    Batch {
        batch: T::Batch,
        respond_to: Response<T::BatchResult, T::Error>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Short operation name, used in logs and mock diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRequest::Create { .. } => "Create",
            ResourceRequest::Get { .. } => "Get",
            ResourceRequest::List { .. } => "List",
            ResourceRequest::Update { .. } => "Update",
            ResourceRequest::Delete { .. } => "Delete",
            ResourceRequest::Action { .. } => "Action",
            ResourceRequest::Batch { .. } => "Batch",
        }
    }
}
