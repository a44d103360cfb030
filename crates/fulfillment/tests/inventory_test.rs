use actor_framework::{ActorClient, MemoryStore};
use chrono::{Duration, TimeZone, Utc};
use fulfillment::clients::InventoryClient;
use fulfillment::inventory_actor::{self, InventoryContext, InventoryError};
use fulfillment::model::{
    AlertKind, DishId, InventoryRecord, InventoryUpdate, StockLine, UserId, SOLD_OUT_REASON,
    UNLIMITED_STOCK,
};
use fulfillment::ports::{ManualClock, RecordingNotifier};
use std::sync::Arc;

struct Setup {
    inventory: InventoryClient,
    store: MemoryStore<InventoryRecord>,
    clock: ManualClock,
    notifier: RecordingNotifier,
}

fn setup() -> Setup {
    let store = MemoryStore::new();
    let clock = ManualClock::at(Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap());
    let notifier = RecordingNotifier::new();
    let (actor, client) = inventory_actor::new(16, store.clone());
    tokio::spawn(actor.run(InventoryContext {
        notifier: Arc::new(notifier.clone()),
        clock: Arc::new(clock.clone()),
        low_stock_percent: 20,
    }));
    Setup {
        inventory: InventoryClient::new(client),
        store,
        clock,
        notifier,
    }
}

fn line(dish: &str, quantity: u32) -> StockLine {
    StockLine {
        dish_id: DishId::from(dish),
        quantity,
    }
}

#[tokio::test]
async fn test_untracked_dish_is_always_available() {
    let s = setup();
    let availability = s
        .inventory
        .check_availability(DishId::from("jus-bissap"))
        .await
        .unwrap();
    assert!(availability.available);
    assert_eq!(availability.stock_remaining, None);

    s.inventory.reserve(vec![line("jus-bissap", 40)]).await.unwrap();
    assert!(s.store.snapshot().is_empty());
}

#[tokio::test]
async fn test_reservation_is_all_or_nothing() {
    let s = setup();
    s.inventory.set_daily_stock("a".into(), 10, Some(5)).await.unwrap();
    s.inventory.set_daily_stock("b".into(), 10, Some(1)).await.unwrap();

    let err = s
        .inventory
        .reserve(vec![line("a", 3), line("b", 2)])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        InventoryError::InsufficientStock {
            dish_id: DishId::from("b"),
            requested: 2,
            available: 1
        }
    );

    let a = s.store.get(&DishId::from("a")).unwrap();
    let b = s.store.get(&DishId::from("b")).unwrap();
    assert_eq!((a.current_stock, b.current_stock), (5, 1));

    let changed = s
        .inventory
        .reserve(vec![line("a", 3), line("b", 1)])
        .await
        .unwrap();
    assert_eq!(changed.len(), 2);
    assert_eq!(s.store.get(&DishId::from("a")).unwrap().current_stock, 2);

    let b = s.inventory.check_availability(DishId::from("b")).await.unwrap();
    assert!(!b.available);
    assert_eq!(b.reason.as_deref(), Some(SOLD_OUT_REASON));
}

#[tokio::test]
async fn test_alerts_reach_the_preparer() {
    let s = setup();
    let chef = UserId::from("chef-awa");
    s.inventory
        .initialize_dish("yassa".into(), Some(chef.clone()), Some(5))
        .await
        .unwrap();

    s.inventory.reserve(vec![line("yassa", 4)]).await.unwrap();
    s.inventory.reserve(vec![line("yassa", 1)]).await.unwrap();

    let kinds: Vec<AlertKind> = s
        .inventory
        .alerts(Some(chef.clone()))
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.kind)
        .collect();
    assert!(kinds.contains(&AlertKind::LowStock));
    assert!(kinds.contains(&AlertKind::OutOfStock));
    assert_eq!(s.notifier.for_user(&chef).len(), 2);
    assert_eq!(s.inventory.out_of_stock_dishes().await.unwrap().len(), 1);

    s.inventory.restore(vec![line("yassa", 1)]).await.unwrap();
    let alerts = s.inventory.alerts(None).await.unwrap();
    assert_eq!(alerts.len(), 3);
    assert!(alerts.iter().any(|a| a.kind == AlertKind::BackInStock));
    assert_eq!(s.inventory.low_stock_dishes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_restore_never_lifts_a_preparer_hold() {
    let s = setup();
    s.inventory.set_daily_stock("mafe".into(), 4, Some(1)).await.unwrap();
    s.inventory.reserve(vec![line("mafe", 1)]).await.unwrap();
    s.inventory
        .set_availability("mafe".into(), false, Some("Plus d'arachide".into()), None)
        .await
        .unwrap();

    s.inventory.restore(vec![line("mafe", 1)]).await.unwrap();

    let availability = s.inventory.check_availability("mafe".into()).await.unwrap();
    assert!(!availability.available);
    assert_eq!(availability.reason.as_deref(), Some("Plus d'arachide"));
    assert_eq!(availability.stock_remaining, Some(1));

    s.inventory
        .set_availability("mafe".into(), true, None, None)
        .await
        .unwrap();
    assert!(s.inventory.check_availability("mafe".into()).await.unwrap().available);
}

#[tokio::test]
async fn test_daily_sweep_restocks_once_per_day() {
    let s = setup();
    s.inventory.set_daily_stock("a".into(), 10, Some(10)).await.unwrap();
    s.inventory.reserve(vec![line("a", 7)]).await.unwrap();

    assert!(s.inventory.daily_restock_sweep().await.unwrap().is_empty());
    assert_eq!(s.store.get(&DishId::from("a")).unwrap().current_stock, 3);

    s.clock.advance(Duration::days(1));
    let restocked = s.inventory.daily_restock_sweep().await.unwrap();
    assert_eq!(restocked.len(), 1);
    assert_eq!(restocked[0].current_stock, 10);

    s.inventory.reserve(vec![line("a", 2)]).await.unwrap();
    assert!(s.inventory.daily_restock_sweep().await.unwrap().is_empty());
    assert_eq!(s.store.get(&DishId::from("a")).unwrap().current_stock, 8);
}

#[tokio::test]
async fn test_sweep_runs_lazily_before_reservation() {
    let s = setup();
    s.inventory.set_daily_stock("a".into(), 2, None).await.unwrap();
    s.inventory.reserve(vec![line("a", 2)]).await.unwrap();
    assert!(s.inventory.reserve(vec![line("a", 1)]).await.is_err());

    s.clock.advance(Duration::days(1));
    s.inventory.reserve(vec![line("a", 1)]).await.unwrap();
    assert_eq!(s.store.get(&DishId::from("a")).unwrap().current_stock, 1);
}

#[tokio::test]
async fn test_sweep_skips_dishes_without_auto_restock() {
    let s = setup();
    s.inventory.set_daily_stock("a".into(), 5, Some(1)).await.unwrap();
    s.inventory
        .configure_dish(
            "a".into(),
            InventoryUpdate {
                auto_restock_enabled: Some(false),
                ..InventoryUpdate::default()
            },
        )
        .await
        .unwrap();

    s.clock.advance(Duration::days(2));
    assert!(s.inventory.daily_restock_sweep().await.unwrap().is_empty());
    assert_eq!(s.store.get(&DishId::from("a")).unwrap().current_stock, 1);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let s = setup();
    let first = s
        .inventory
        .initialize_dish("pastels".into(), None, None)
        .await
        .unwrap();
    assert_eq!(first.current_stock, UNLIMITED_STOCK);
    assert!(first.daily_limit.is_none());

    s.inventory.reserve(vec![line("pastels", 9)]).await.unwrap();
    let again = s
        .inventory
        .initialize_dish("pastels".into(), None, Some(3))
        .await
        .unwrap();
    assert_eq!(again.current_stock, UNLIMITED_STOCK - 9);
    assert!(again.daily_limit.is_none());
    assert_eq!(s.inventory.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_manual_stock_edits_are_bounded() {
    let s = setup();
    assert!(matches!(
        s.inventory.restock("ghost".into(), 3).await,
        Err(InventoryError::NotFound(_))
    ));
    assert!(matches!(
        s.inventory.set_daily_stock("a".into(), 5, Some(6)).await,
        Err(InventoryError::InvalidQuantity { quantity: 6, .. })
    ));

    s.inventory.set_daily_stock("a".into(), 5, Some(0)).await.unwrap();
    assert!(!s.inventory.check_availability("a".into()).await.unwrap().available);

    let record = s.inventory.restock("a".into(), 5).await.unwrap();
    assert!(record.available);
    assert_eq!(record.alerts.last().map(|a| a.kind), Some(AlertKind::BackInStock));
}

#[tokio::test]
async fn test_concurrent_reservations_never_oversell() {
    let s = setup();
    s.inventory.set_daily_stock("a".into(), 10, Some(3)).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let inventory = s.inventory.clone();
        tasks.push(tokio::spawn(async move { inventory.reserve(vec![line("a", 1)]).await }));
    }
    let mut succeeded = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }
    assert_eq!(succeeded, 3);
    assert_eq!(s.store.get(&DishId::from("a")).unwrap().current_stock, 0);
}
