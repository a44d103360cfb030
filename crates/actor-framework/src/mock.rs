//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` type hands out a real `ResourceClient<T>` whose requests are answered
//! from a queue of expectations instead of an actor. It lets you unit-test logic *around* a
//! client, or an actor whose dependencies are other actors, without spawning those actors.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **State** | No real state (expectations) | Real state management |
//! | **Use Case** | Unit testing logic *around* the client | Testing the actor itself or full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Testing Strategies
//!
//! 1. **Client logic**: wrap `mock.client()` in your typed client and assert on what it returns.
//! 2. **Single actor**: spawn one `ResourceActor` over a `MemoryStore` and drive it directly.
//! 3. **Actor with mocked dependencies**: spawn the actor under test and pass mock clients in
//!    its context. This is how the order actor is tested against a scripted inventory.
//! 4. **Full system**: start every actor and exercise end-to-end flows and concurrency.
//!
//! ## Testing Failure Scenarios
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, BatchOutcome, FrameworkError, Records};
//! use async_trait::async_trait;
//! use std::convert::Infallible;
//!
//! #[derive(Clone, Debug)] struct Dish { id: u32 }
//! #[derive(Debug, thiserror::Error)] #[error(transparent)] struct DishError(#[from] FrameworkError);
//!
//! #[async_trait]
//! impl ActorEntity for Dish {
//!     type Id = u32; type Create = (); type Update = ();
//!     type Action = Infallible; type ActionResult = ();
//!     type Batch = Infallible; type BatchResult = ();
//!     type Context = (); type Error = DishError;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, _: ()) -> Result<Self, DishError> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), DishError> { Ok(()) }
//!     async fn handle_action(&mut self, a: Infallible, _: &()) -> Result<(), DishError> { match a {} }
//!     async fn handle_batch(_: &Records<Self>, b: Infallible, _: &()) -> Result<BatchOutcome<Self>, DishError> { match b {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Dish>::new();
//!     let client = mock.client();
//!
//!     // Simulate a downstream failure
//!     mock.expect_get(1).return_err(FrameworkError::ActorClosed.into());
//!
//!     let result = client.get(1).await;
//!     assert!(matches!(result, Err(DishError(FrameworkError::ActorClosed))));
//! }
//! ```
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and a receiver, or use the fluent [`MockClient`] API.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client, with its canned reply.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, T::Error>,
    },
    Create {
        response: Result<T, T::Error>,
    },
    List {
        response: Result<Vec<T>, T::Error>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, T::Error>,
    },
    Batch {
        response: Result<T::BatchResult, T::Error>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Get { .. } => "Get",
            Expectation::Create { .. } => "Create",
            Expectation::List { .. } => "List",
            Expectation::Action { .. } => "Action",
            Expectation::Batch { .. } => "Batch",
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ActorEntity>(queue: &Queue<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the next expectation
/// (wrong operation or wrong id) panics the mock task, which closes the channel and surfaces
/// as `FrameworkError::ActorClosed`/`ActorDropped` on the caller side.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<InventoryRecord>::new();
/// mock.expect_batch().return_ok(InventoryReply::Reserved(vec![]));
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "Get called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to, .. }, Some(Expectation::List { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "Action called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Batch { respond_to, .. }, Some(Expectation::Batch { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        panic!(
                            "Unexpected {} request, next expectation was {}",
                            request.kind(),
                            expectation.as_ref().map_or("none", Expectation::kind)
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(&self.expectations, move |response| Expectation::Get {
            id,
            response,
        })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(&self.expectations, |response| Expectation::Create {
            response,
        })
    }

    /// Expects a `list` operation.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(&self.expectations, |response| Expectation::List { response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(&self.expectations, move |response| Expectation::Action {
            id,
            response,
        })
    }

    /// Expects a `batch` operation.
    pub fn expect_batch(&mut self) -> ExpectationBuilder<T, T::BatchResult> {
        ExpectationBuilder::new(&self.expectations, |response| Expectation::Batch {
            response,
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder finishing one expectation with its reply.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, T::Error>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: &Queue<T>,
        make: impl FnOnce(Result<R, T::Error>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations: expectations.clone(),
            make: Box::new(make),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: T::Error) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, T::Error>) {
        let expectation = (self.make)(response);
        lock(&self.expectations).push_back(expectation);
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// Instead of spinning up a `ResourceActor`, the test holds the receiving end and plays the
/// actor itself: it inspects each request as it arrives and answers through the enclosed
/// oneshot sender. This gives full control over ordering, delays and failures.
///
/// **Note**: Consider using [`MockClient`] for a more fluent API.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T, T::Error>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, T::Error>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, T::Error>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Batch request
pub async fn expect_batch<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Batch, oneshot::Sender<Result<T::BatchResult, T::Error>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Batch { batch, respond_to }) => Some((batch, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BatchOutcome, Records};
    use crate::error::FrameworkError;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Courier {
        id: u32,
        name: String,
        rides: u32,
    }

    #[derive(Debug)]
    struct CourierCreate {
        name: String,
    }

    #[derive(Debug)]
    enum CourierAction {
        CompleteRide,
    }

    #[derive(Debug)]
    enum CourierBatch {
        ResetAll,
    }

    #[derive(Debug, thiserror::Error)]
    enum CourierError {
        #[error("Courier is off duty")]
        OffDuty,
        #[error(transparent)]
        Framework(#[from] FrameworkError),
    }

    #[async_trait]
    impl ActorEntity for Courier {
        type Id = u32;
        type Create = CourierCreate;
        type Update = ();
        type Action = CourierAction;
        type ActionResult = u32;
        type Batch = CourierBatch;
        type BatchResult = usize;
        type Context = ();
        type Error = CourierError;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn from_create_params(id: u32, params: CourierCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                name: params.name,
                rides: 0,
            })
        }

        async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(
            &mut self,
            action: CourierAction,
            _ctx: &(),
        ) -> Result<u32, Self::Error> {
            match action {
                CourierAction::CompleteRide => {
                    self.rides += 1;
                    Ok(self.rides)
                }
            }
        }

        async fn handle_batch(
            records: &Records<Self>,
            batch: CourierBatch,
            _ctx: &(),
        ) -> Result<BatchOutcome<Self>, Self::Error> {
            match batch {
                CourierBatch::ResetAll => {
                    let changed: Vec<Courier> = records
                        .values()
                        .map(|c| Courier {
                            rides: 0,
                            ..c.clone()
                        })
                        .collect();
                    let count = changed.len();
                    Ok(BatchOutcome::new(changed, count))
                }
            }
        }
    }

    fn courier(id: u32, name: &str) -> Courier {
        Courier {
            id,
            name: name.to_string(),
            rides: 0,
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Courier>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(CourierCreate {
                    name: "Awa".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Awa");
        responder.send(Ok(courier(1, "Awa"))).unwrap();

        let result = create_task.await.unwrap();
        assert!(matches!(result, Ok(c) if c.id == 1));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Courier>::new();

        mock.expect_create().return_ok(courier(1, "Awa"));
        mock.expect_get(1).return_ok(Some(courier(1, "Awa")));
        mock.expect_action(1).return_err(CourierError::OffDuty);
        mock.expect_batch().return_ok(3);

        let client = mock.client();

        let created = client
            .create(CourierCreate {
                name: "Awa".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let fetched = client.get(1).await.unwrap();
        assert_eq!(fetched.unwrap().name, "Awa");

        let ride = client.perform_action(1, CourierAction::CompleteRide).await;
        assert!(matches!(ride, Err(CourierError::OffDuty)));

        let reset = client.batch(CourierBatch::ResetAll).await.unwrap();
        assert_eq!(reset, 3);

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_mismatch_surfaces_as_framework_error() {
        let mut mock = MockClient::<Courier>::new();
        mock.expect_list().return_ok(vec![]);

        let client = mock.client();
        let result = client.get(7).await;
        assert!(matches!(
            result,
            Err(CourierError::Framework(
                FrameworkError::ActorClosed | FrameworkError::ActorDropped
            ))
        ));
    }

    #[tokio::test]
    async fn test_batch_helper_hands_out_command() {
        let (client, mut receiver) = create_mock_client::<Courier>(10);
        let task = tokio::spawn(async move { client.batch(CourierBatch::ResetAll).await });

        let (batch, responder) = expect_batch(&mut receiver).await.unwrap();
        assert!(matches!(batch, CourierBatch::ResetAll));
        responder.send(Ok(2)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 2);
    }
}
