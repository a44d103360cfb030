use crate::clients::{InventoryClient, OrderClient, PromoClient};
use crate::config::{ConfigError, FulfillmentConfig};
use crate::inventory_actor::{self, InventoryContext};
use crate::model::{InventoryRecord, Order, PromoCode};
use crate::order_actor::{self, OrderContext};
use crate::ports::{Catalog, Clock, DeliveryZones, Notifier};
use crate::promo_actor::{self, PromoContext, PromoError};
use actor_framework::{JsonFileStore, MemoryStore, Store, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to seed promo code: {0}")]
    Seed(#[from] PromoError),
    #[error("Actor task failed: {0}")]
    Join(String),
}

/// The outside world as seen by the core.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn Catalog>,
    pub zones: Arc<dyn DeliveryZones>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// The running fulfillment core: three actors and the clients to reach them.
///
/// # Example
///
/// ```ignore
/// let system = FulfillmentSystem::start(&config, collaborators).await?;
/// let order = system.orders.create_order(checkout).await?;
/// system.orders.transition(order.id, OrderStatus::Confirmed, None).await?;
/// system.shutdown().await?;
/// ```
/// The three durable collections behind the actors.
pub struct Stores {
    pub orders: Box<dyn Store<Order>>,
    pub inventory: Box<dyn Store<InventoryRecord>>,
    pub promos: Box<dyn Store<PromoCode>>,
}

impl Stores {
    /// JSON files under `data_dir` when configured, otherwise fresh in-memory collections.
    pub fn open(config: &FulfillmentConfig) -> Result<Self, StoreError> {
        Ok(Self {
            orders: open_store(config, "orders.json")?,
            inventory: open_store(config, "inventory.json")?,
            promos: open_store(config, "promos.json")?,
        })
    }
}

pub struct FulfillmentSystem {
    pub orders: OrderClient,
    pub inventory: InventoryClient,
    pub promos: PromoClient,
    handles: Vec<JoinHandle<()>>,
}

fn open_store<T>(config: &FulfillmentConfig, file: &str) -> Result<Box<dyn Store<T>>, StoreError>
where
    T: actor_framework::ActorEntity + Serialize + DeserializeOwned,
{
    match &config.data_dir {
        Some(dir) => {
            let path = Path::new(dir).join(file);
            info!(path = %path.display(), "Using json store");
            Ok(Box::new(JsonFileStore::<T>::open(path)?))
        }
        None => Ok(Box::new(MemoryStore::<T>::new())),
    }
}

impl FulfillmentSystem {
    /// Opens the configured stores, spawns the actors and seeds the configured promo codes.
    pub async fn start(config: &FulfillmentConfig, deps: Collaborators) -> Result<Self, SystemError> {
        let stores = Stores::open(config)?;
        Self::start_with_stores(config, deps, stores).await
    }

    /// Like [`start`](Self::start), over caller-supplied stores.
    pub async fn start_with_stores(
        config: &FulfillmentConfig,
        deps: Collaborators,
        stores: Stores,
    ) -> Result<Self, SystemError> {
        config.validate()?;
        let timeout = config.request_timeout();
        let buffer = config.channel_buffer;

        // 1. Create actors (no dependencies)
        let (inventory_actor, inventory_raw) = inventory_actor::new(buffer, stores.inventory);
        let (promo_actor, promos_raw) = promo_actor::new(buffer, stores.promos);
        let (order_actor, orders) = order_actor::new(buffer, stores.orders);

        // No deadline: the order actor must see the outcome of every reservation and usage it starts.
        let inventory_for_orders = InventoryClient::new(inventory_raw.clone());
        let promos_for_orders = PromoClient::new(promos_raw.clone());

        let inventory = InventoryClient::new(inventory_raw.with_timeout(timeout))
            .with_low_stock_percent(config.low_stock_percent);
        let promos = PromoClient::new(promos_raw.with_timeout(timeout));
        let orders = OrderClient::new(orders.with_timeout(timeout));

        // 2. Start actors with injected context
        let inventory_handle = tokio::spawn(inventory_actor.run(InventoryContext {
            notifier: deps.notifier.clone(),
            clock: deps.clock.clone(),
            low_stock_percent: config.low_stock_percent,
        }));
        let promo_handle = tokio::spawn(promo_actor.run(PromoContext {
            clock: deps.clock.clone(),
        }));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            inventory: inventory_for_orders,
            promos: promos_for_orders,
            catalog: deps.catalog,
            zones: deps.zones,
            notifier: deps.notifier,
            clock: deps.clock,
            number_prefix: config.order_number_prefix.clone(),
        }));

        let system = Self {
            orders,
            inventory,
            promos,
            handles: vec![inventory_handle, promo_handle, order_handle],
        };

        // 3. Seed promo codes that do not exist yet
        for seed in &config.promos {
            match system.promos.create_promo(seed.clone()).await {
                Ok(promo) => info!(code = %promo.code, "Promo seeded"),
                Err(PromoError::DuplicateCode(code)) => info!(%code, "Promo already present"),
                Err(e) => return Err(e.into()),
            }
        }

        info!("Fulfillment system started");
        Ok(system)
    }

    /// Closes every channel and waits for the actors to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down fulfillment system...");
        drop(self.orders);
        drop(self.inventory);
        drop(self.promos);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::Join(e.to_string()));
            }
        }
        info!("Fulfillment system stopped");
        Ok(())
    }
}
