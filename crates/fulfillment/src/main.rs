//! Demo of the fulfillment core: one dish, one welcome code, a first order that gets the
//! discount and a second one that does not.
//!
//! ```bash
//! RUST_LOG=info cargo run --bin fulfillment-demo
//! ```

use chrono::{Duration, Utc};
use fulfillment::config::FulfillmentConfig;
use fulfillment::lifecycle::{setup_tracing, Collaborators, FulfillmentSystem};
use fulfillment::model::{
    CustomerSnapshot, DiscountType, Dish, DishId, InventoryUpdate, LineRequest, OrderCreate,
    OrderStatus, PaymentMethod, PromoCreate, UserId,
};
use fulfillment::ports::{StaticCatalog, SystemClock, TracingNotifier, ZoneTable};
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_tracing();

    let mut config = FulfillmentConfig::from_env()?;
    if config.promos.is_empty() {
        config.promos.push(PromoCreate {
            code: "BIENVENUE10".to_string(),
            discount_type: DiscountType::Percentage,
            value: 10,
            description: "10% sur la première commande".to_string(),
            min_order_amount: Some(1000),
            max_discount: None,
            valid_from: Utc::now() - Duration::days(1),
            valid_until: Utc::now() + Duration::days(30),
            usage_limit: None,
            per_user_limit: Some(1),
            first_order_only: true,
            eligible_categories: None,
        });
    }

    let thieb = DishId::from("thieboudienne");
    let catalog = StaticCatalog::new([Dish {
        id: thieb.clone(),
        name: "Thieboudienne".to_string(),
        price: 2000,
        category: "plats".to_string(),
    }]);
    let deps = Collaborators {
        catalog: Arc::new(catalog),
        zones: Arc::new(ZoneTable::new(config.zones.clone(), config.default_delivery_fee)),
        notifier: Arc::new(TracingNotifier),
        clock: Arc::new(SystemClock),
    };

    let system = FulfillmentSystem::start(&config, deps).await?;
    let chef = UserId::from("chef-awa");
    system
        .inventory
        .set_daily_stock(thieb.clone(), 5, None)
        .await?;
    system
        .inventory
        .configure_dish(
            thieb.clone(),
            InventoryUpdate {
                preparer_id: Some(chef.clone()),
                auto_restock_enabled: Some(true),
            },
        )
        .await?;

    let customer = CustomerSnapshot {
        id: UserId::from("client-moussa"),
        name: "Moussa".to_string(),
        phone: "+221 77 000 00 00".to_string(),
        address: "12 rue Carnot, Plateau".to_string(),
    };
    let checkout = OrderCreate {
        customer: customer.clone(),
        items: vec![LineRequest::new(thieb.clone(), 2)],
        payment_method: PaymentMethod::Mobile,
        promo_code: Some("bienvenue10".to_string()),
        notes: None,
    };

    let order = async { system.orders.create_order(checkout.clone()).await }
        .instrument(tracing::info_span!("first_order"))
        .await?;
    info!(
        order_number = %order.order_number,
        subtotal = order.subtotal,
        discount = order.discount,
        delivery_fee = order.delivery_fee,
        total = order.total,
        "First order placed"
    );

    let stock = system.inventory.check_availability(thieb.clone()).await?;
    info!(remaining = ?stock.stock_remaining, "Stock after first order");

    system.orders.assign_preparer(order.id, chef).await?;
    for status in [OrderStatus::Confirmed, OrderStatus::Preparing] {
        system.orders.transition(order.id, status, None).await?;
    }

    match system.orders.create_order(checkout).await {
        Ok(second) => info!(order_number = %second.order_number, "Second order placed"),
        Err(e) => warn!(error = %e, kind = ?e.kind(), "Second order refused"),
    }

    system.shutdown().await?;
    Ok(())
}
