use actor_framework::mock::create_mock_client;
use actor_framework::{
    ActorClient, ActorEntity, BatchOutcome, FrameworkError, MemoryStore, Records, ResourceActor,
    ResourceClient, Store, StoreError,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    name: String,
    value: i64,
}

#[derive(Debug)]
struct CounterCreate {
    name: String,
    start: i64,
}

#[derive(Debug)]
enum CounterAction {
    Add(i64),
}

#[derive(Debug)]
enum CounterBatch {
    AddAll(Vec<(String, i64)>),
}

#[derive(Debug, thiserror::Error)]
enum CounterError {
    #[error("Counter would go negative")]
    Negative,
    #[error("Follow-up failed")]
    FollowUp,
    #[error(transparent)]
    Framework(#[from] FrameworkError),
}

/// Records which hooks ran, in order.
type Events = Arc<Mutex<Vec<String>>>;

fn log(events: &Events, line: String) {
    events.lock().unwrap().push(line);
}

#[async_trait]
impl ActorEntity for Counter {
    type Id = String;
    type Create = CounterCreate;
    type Update = i64;
    type Action = CounterAction;
    type ActionResult = i64;
    type Batch = CounterBatch;
    type BatchResult = Vec<i64>;
    type Context = Events;
    type Error = CounterError;

    fn id(&self) -> &String {
        &self.name
    }

    fn from_create_params(id: String, params: CounterCreate) -> Result<Self, Self::Error> {
        if params.start < 0 {
            return Err(CounterError::Negative);
        }
        Ok(Self {
            name: id,
            value: params.start,
        })
    }

    async fn on_create(&mut self, records: &Records<Self>, ctx: &Events) -> Result<(), Self::Error> {
        log(ctx, format!("on_create {} seen={}", self.name, records.len()));
        Ok(())
    }

    async fn after_create(&self, ctx: &Events) -> Result<(), Self::Error> {
        // 13 stands in for a follow-up step that fails after the commit.
        if self.value == 13 {
            return Err(CounterError::FollowUp);
        }
        log(ctx, format!("after_create {}", self.name));
        Ok(())
    }

    async fn on_create_aborted(&self, ctx: &Events) {
        log(ctx, format!("aborted {}", self.name));
    }

    async fn on_update(&mut self, value: i64, _ctx: &Events) -> Result<(), Self::Error> {
        self.value = value;
        Ok(())
    }

    async fn handle_action(&mut self, action: CounterAction, _ctx: &Events) -> Result<i64, Self::Error> {
        match action {
            CounterAction::Add(delta) => {
                let next = self.value + delta;
                if next < 0 {
                    return Err(CounterError::Negative);
                }
                self.value = next;
                Ok(next)
            }
        }
    }

    async fn after_action(&self, result: &i64, ctx: &Events) {
        log(ctx, format!("after_action {}={}", self.name, result));
    }

    async fn on_action_aborted(&self, result: &i64, ctx: &Events) {
        log(ctx, format!("action_aborted {}={}", self.name, result));
    }

    async fn handle_batch(
        records: &Records<Self>,
        batch: CounterBatch,
        _ctx: &Events,
    ) -> Result<BatchOutcome<Self>, Self::Error> {
        match batch {
            CounterBatch::AddAll(deltas) => {
                let mut changed = Vec::new();
                for (name, delta) in deltas {
                    let mut counter = records
                        .get(&name)
                        .cloned()
                        .ok_or(FrameworkError::NotFound(name))?;
                    counter.value += delta;
                    if counter.value < 0 {
                        return Err(CounterError::Negative);
                    }
                    changed.push(counter);
                }
                let values = changed.iter().map(|c| c.value).collect();
                Ok(BatchOutcome::new(changed, values))
            }
        }
    }
}

impl CounterCreate {
    fn new(name: &str, start: i64) -> Self {
        Self {
            name: name.to_string(),
            start,
        }
    }
}

/// Memory store whose writes can be switched off.
#[derive(Clone)]
struct FlakyStore {
    inner: MemoryStore<Counter>,
    broken: Arc<AtomicBool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            broken: Arc::new(AtomicBool::new(false)),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("disk full".into()));
        }
        Ok(())
    }
}

impl Store<Counter> for FlakyStore {
    fn load_all(&self) -> Result<Vec<Counter>, StoreError> {
        self.inner.load_all()
    }

    fn put_many(&mut self, items: &[Counter]) -> Result<(), StoreError> {
        self.check()?;
        self.inner.put_many(items)
    }

    fn remove(&mut self, id: &String) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove(id)
    }
}

struct CounterClient {
    inner: ResourceClient<Counter>,
}

impl ActorClient<Counter> for CounterClient {
    fn inner(&self) -> &ResourceClient<Counter> {
        &self.inner
    }
}

fn start(store: impl Store<Counter>) -> (ResourceClient<Counter>, Events) {
    let events: Events = Arc::default();
    let (actor, client) = ResourceActor::new(10, store, |p: &CounterCreate| p.name.clone());
    tokio::spawn(actor.run(events.clone()));
    (client, events)
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let store = MemoryStore::new();
    let (client, events) = start(store.clone());

    let created = client.create(CounterCreate::new("meals", 2)).await.unwrap();
    assert_eq!(created.value, 2);

    let value = client
        .perform_action("meals".into(), CounterAction::Add(3))
        .await
        .unwrap();
    assert_eq!(value, 5);
    assert_eq!(store.get(&"meals".to_string()).unwrap().value, 5);

    let updated = client.update("meals".into(), 9).await.unwrap();
    assert_eq!(updated.value, 9);

    client.delete("meals".into()).await.unwrap();
    assert!(client.get("meals".into()).await.unwrap().is_none());
    assert!(store.snapshot().is_empty());

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "on_create meals seen=0".to_string(),
            "after_create meals".to_string(),
            "after_action meals=5".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_id_is_rejected() {
    let (client, _) = start(MemoryStore::new());
    client.create(CounterCreate::new("dup", 1)).await.unwrap();

    let again = client.create(CounterCreate::new("dup", 4)).await;
    assert!(matches!(
        again,
        Err(CounterError::Framework(FrameworkError::AlreadyExists(_)))
    ));
    assert_eq!(client.get("dup".into()).await.unwrap().unwrap().value, 1);
}

#[tokio::test]
async fn test_failed_action_leaves_state_untouched() {
    let (client, events) = start(MemoryStore::new());
    client.create(CounterCreate::new("c", 1)).await.unwrap();

    let result = client.perform_action("c".into(), CounterAction::Add(-5)).await;
    assert!(matches!(result, Err(CounterError::Negative)));
    assert_eq!(client.get("c".into()).await.unwrap().unwrap().value, 1);
    assert!(!events
        .lock()
        .unwrap()
        .iter()
        .any(|e| e.starts_with("after_action")));
}

#[tokio::test]
async fn test_batch_is_all_or_nothing() {
    let store = MemoryStore::new();
    let (client, _) = start(store.clone());
    client.create(CounterCreate::new("a", 5)).await.unwrap();
    client.create(CounterCreate::new("b", 1)).await.unwrap();

    // Second delta fails, so the first must not be applied either.
    let result = client
        .batch(CounterBatch::AddAll(vec![("a".into(), -2), ("b".into(), -3)]))
        .await;
    assert!(matches!(result, Err(CounterError::Negative)));
    let values: Vec<i64> = store.snapshot().iter().map(|c| c.value).collect();
    assert_eq!(values, vec![5, 1]);

    let ok = client
        .batch(CounterBatch::AddAll(vec![("a".into(), -2), ("b".into(), 3)]))
        .await
        .unwrap();
    assert_eq!(ok, vec![3, 4]);

    let missing = client
        .batch(CounterBatch::AddAll(vec![("zzz".into(), 1)]))
        .await;
    assert!(matches!(
        missing,
        Err(CounterError::Framework(FrameworkError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_store_failure_rolls_back_and_compensates() {
    let store = FlakyStore::new();
    let (client, events) = start(store.clone());
    client.create(CounterCreate::new("x", 2)).await.unwrap();

    store.broken.store(true, Ordering::SeqCst);

    let action = client.perform_action("x".into(), CounterAction::Add(1)).await;
    assert!(matches!(
        action,
        Err(CounterError::Framework(FrameworkError::Store(_)))
    ));
    let create = client.create(CounterCreate::new("y", 0)).await;
    assert!(create.is_err());

    store.broken.store(false, Ordering::SeqCst);
    assert_eq!(client.get("x".into()).await.unwrap().unwrap().value, 2);
    assert!(client.get("y".into()).await.unwrap().is_none());

    let log = events.lock().unwrap().clone();
    assert!(log.contains(&"action_aborted x=3".to_string()));
    assert!(log.contains(&"aborted y".to_string()));
}

#[tokio::test]
async fn test_after_create_failure_removes_entity() {
    let store = MemoryStore::new();
    let (client, events) = start(store.clone());

    let result = client.create(CounterCreate::new("unlucky", 13)).await;
    assert!(matches!(result, Err(CounterError::FollowUp)));
    assert!(client.get("unlucky".into()).await.unwrap().is_none());
    assert!(store.snapshot().is_empty());
    assert!(events
        .lock()
        .unwrap()
        .contains(&"aborted unlucky".to_string()));
}

#[tokio::test]
async fn test_list_filters_and_orders_by_id() {
    let (client, _) = start(MemoryStore::new());
    for (name, start) in [("c", 3), ("a", 1), ("b", 8)] {
        client.create(CounterCreate::new(name, start)).await.unwrap();
    }

    let big = client.list(|c: &Counter| c.value > 2).await.unwrap();
    let names: Vec<&str> = big.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);

    let wrapped = CounterClient { inner: client };
    assert_eq!(wrapped.list_all().await.unwrap().len(), 3);
    assert!(matches!(
        wrapped.fetch("nope".into()).await,
        Err(CounterError::Framework(FrameworkError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_store_contents_are_loaded_on_start() {
    let seeded = MemoryStore::with_items([Counter {
        name: "kept".into(),
        value: 7,
    }]);
    let (client, _) = start(seeded);
    assert_eq!(client.get("kept".into()).await.unwrap().unwrap().value, 7);
}

#[tokio::test]
async fn test_client_timeout() {
    let (client, _receiver) = create_mock_client::<Counter>(1);
    let client = client.with_timeout(Duration::from_millis(20));

    // Nobody answers on the other end.
    let result = client.get("slow".into()).await;
    assert!(matches!(
        result,
        Err(CounterError::Framework(FrameworkError::Timeout(_)))
    ));
}

#[tokio::test]
async fn test_closed_actor_reports_actor_closed() {
    let (client, receiver) = create_mock_client::<Counter>(1);
    drop(receiver);
    let result = client.get("gone".into()).await;
    assert!(matches!(
        result,
        Err(CounterError::Framework(FrameworkError::ActorClosed))
    ));
}
