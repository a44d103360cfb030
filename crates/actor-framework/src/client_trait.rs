//! # ActorClient Trait
//!
//! Provides a common interface for resource‑specific clients, adding default `get`, `fetch`
//! and `list_all` methods built on top of a generic `ResourceClient`.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{
///     ActorClient, ActorEntity, BatchOutcome, FrameworkError, Records, ResourceClient,
/// };
/// use async_trait::async_trait;
/// use std::convert::Infallible;
///
/// #[derive(Clone, Debug)]
/// struct Courier { id: u32 }
/// #[derive(Debug, thiserror::Error)]
/// #[error(transparent)]
/// struct CourierError(#[from] FrameworkError);
///
/// #[async_trait]
/// impl ActorEntity for Courier {
///     type Id = u32;
///     type Create = ();
///     type Update = ();
///     type Action = Infallible;
///     type ActionResult = ();
///     type Batch = Infallible;
///     type BatchResult = ();
///     type Context = ();
///     type Error = CourierError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn from_create_params(id: u32, _: ()) -> Result<Self, CourierError> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), CourierError> { Ok(()) }
///     async fn handle_action(&mut self, a: Infallible, _: &()) -> Result<(), CourierError> { match a {} }
///     async fn handle_batch(_: &Records<Self>, b: Infallible, _: &()) -> Result<BatchOutcome<Self>, CourierError> { match b {} }
/// }
///
/// struct CourierClient {
///     inner: ResourceClient<Courier>,
/// }
///
/// impl ActorClient<Courier> for CourierClient {
///     fn inner(&self) -> &ResourceClient<Courier> {
///         &self.inner
///     }
/// }
///
/// async fn usage(client: CourierClient) {
///     // get(), fetch() and list_all() are provided automatically
///     let _ = client.get(1).await;
///     let _ = client.fetch(1).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await
    }

    /// Fetch an entity by ID, failing with `NotFound` when it does not exist.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<T, T::Error> {
        let label = id.to_string();
        self.inner()
            .get(id)
            .await?
            .ok_or_else(|| FrameworkError::NotFound(label).into())
    }

    /// Every entity in the collection, ordered by id.
    async fn list_all(&self) -> Result<Vec<T>, T::Error> {
        self.inner().list(|_| true).await
    }
}
