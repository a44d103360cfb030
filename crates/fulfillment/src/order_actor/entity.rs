//! Entity trait implementation for the Order domain type.
//!
//! Creation runs the whole checkout inside the order actor: pricing, promo validation, stock
//! reservation and totals happen in `on_create`, usage recording in `after_create`, and
//! `on_create_aborted` gives the stock back when the order cannot be committed. Because the
//! actor handles one request at a time, two checkouts never validate the same promo against
//! the same usage count.

use super::actions::{OrderAction, OrderActionResult, OrderChange};
use super::error::OrderError;
use super::transitions::{self, Effect};
use crate::clients::{InventoryClient, PromoClient};
use crate::model::{
    Amount, AppliedPromo, CategoryAmount, DiscountType, Notification, NotificationKind, Order,
    OrderCreate, OrderId, OrderLine, OrderStatus, OrderUpdate, UsageRecord, UserId,
    ValidationRequest,
};
use crate::ports::{emit_quietly, Catalog, Clock, DeliveryZones, Notifier};
use actor_framework::{ActorEntity, BatchOutcome, Records};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info, warn};

const CREATED_NOTE: &str = "Commande créée";
const ORDER_NUMBER_MODULUS: i64 = 100_000_000;

/// Dependencies of the order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub inventory: InventoryClient,
    pub promos: PromoClient,
    pub catalog: Arc<dyn Catalog>,
    pub zones: Arc<dyn DeliveryZones>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub number_prefix: String,
}

/// True when `customer` has no delivered order yet.
pub fn is_first_order(records: &Records<Order>, customer: &UserId) -> bool {
    !records
        .values()
        .any(|o| &o.customer.id == customer && o.status == OrderStatus::Delivered)
}

/// `prefix` followed by the last eight digits of `at` in milliseconds, bumped past any
/// number already taken.
fn next_order_number(records: &Records<Order>, prefix: &str, at: DateTime<Utc>) -> String {
    let taken: HashSet<&str> = records.values().map(|o| o.order_number.as_str()).collect();
    let mut n = at.timestamp_millis().rem_euclid(ORDER_NUMBER_MODULUS);
    loop {
        let candidate = format!("{prefix}{n:08}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n = (n + 1) % ORDER_NUMBER_MODULUS;
    }
}

fn category_amounts(items: &[OrderLine]) -> Vec<CategoryAmount> {
    let mut totals: BTreeMap<&str, Amount> = BTreeMap::new();
    for line in items {
        *totals.entry(line.category.as_str()).or_default() += line.line_total();
    }
    totals
        .into_iter()
        .map(|(category, amount)| CategoryAmount {
            category: category.to_string(),
            amount,
        })
        .collect()
}

fn status_notification(order: &Order, target: UserId, to: OrderStatus, link: &str) -> Notification {
    let kind = match to {
        OrderStatus::Delivering | OrderStatus::Delivered => NotificationKind::Delivery,
        _ => NotificationKind::Order,
    };
    Notification {
        target_user_id: target,
        kind,
        title: format!("Commande {}", order.order_number),
        message: to.message().to_string(),
        link: Some(link.to_string()),
        data: json!({
            "order_id": order.id.0,
            "order_number": order.order_number,
            "status": to,
        }),
    }
}

fn assignment_notification(order: &Order, assignee: UserId, role: &str, link: &str) -> Notification {
    Notification {
        target_user_id: assignee,
        kind: NotificationKind::Order,
        title: format!("Commande {} assignée", order.order_number),
        message: format!("Vous êtes {role} de la commande {}", order.order_number),
        link: Some(link.to_string()),
        data: json!({
            "order_id": order.id.0,
            "order_number": order.order_number,
            "role": role,
        }),
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Batch = Infallible;
    type BatchResult = ();
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Checks the request shape. Pricing and totals are filled in by `on_create`.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(line) = params.items.iter().find(|l| l.quantity == 0) {
            return Err(OrderError::InvalidQuantity {
                dish_id: line.dish_id.clone(),
            });
        }
        let promo_code = params
            .promo_code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            id,
            order_number: String::new(),
            customer: params.customer,
            items: Vec::new(),
            subtotal: 0,
            discount: 0,
            delivery_fee: 0,
            delivery_fee_waived: 0,
            total: 0,
            payment_method: params.payment_method,
            promo: None,
            notes: params.notes,
            status: OrderStatus::Pending,
            status_history: Vec::new(),
            assigned_preparer_id: None,
            assigned_courier_id: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            delivered_at: None,
            requested: params.items,
            promo_code,
        })
    }

    async fn on_create(&mut self, records: &Records<Self>, ctx: &OrderContext) -> Result<(), OrderError> {
        let now = ctx.clock.now();

        let mut items = Vec::with_capacity(self.requested.len());
        for request in &self.requested {
            let dish = ctx
                .catalog
                .get_dish(&request.dish_id)
                .await
                .ok_or_else(|| OrderError::DishNotFound(request.dish_id.clone()))?;
            if dish.price < 0 {
                return Err(OrderError::InvalidPrice {
                    dish_id: request.dish_id.clone(),
                });
            }
            items.push(OrderLine {
                dish_id: request.dish_id.clone(),
                dish_name: dish.name,
                category: dish.category,
                quantity: request.quantity,
                unit_price: dish.price,
            });
        }
        let subtotal: Amount = items.iter().map(OrderLine::line_total).sum();

        let validated = match &self.promo_code {
            Some(code) => {
                let request = ValidationRequest {
                    code: code.clone(),
                    user_id: self.customer.id.clone(),
                    subtotal,
                    is_first_order: is_first_order(records, &self.customer.id),
                    lines: category_amounts(&items),
                };
                Some(ctx.promos.validate(request).await?)
            }
            None => None,
        };

        let mut zone_fee = ctx.zones.fee_for_address(&self.customer.address);
        if zone_fee < 0 {
            warn!(address = %self.customer.address, fee = zone_fee, "Negative delivery fee, using 0");
            zone_fee = 0;
        }
        let (discount, waived) = match &validated {
            Some(v) if v.promo.discount_type == DiscountType::FreeDelivery => {
                (0, v.discount.min(zone_fee).max(0))
            }
            Some(v) => (v.discount.min(subtotal).max(0), 0),
            None => (0, 0),
        };

        // Last fallible step before the order exists: on_create_aborted does not run for it.
        self.items = items;
        ctx.inventory.reserve(self.stock_lines()).await?;

        self.subtotal = subtotal;
        self.discount = discount;
        self.delivery_fee_waived = waived;
        self.delivery_fee = zone_fee - waived;
        self.total = subtotal - discount + self.delivery_fee;
        self.promo = validated.map(|v| AppliedPromo {
            promo_id: v.promo.id,
            code: v.promo.code,
            amount: discount + waived,
        });
        self.order_number = next_order_number(records, &ctx.number_prefix, now);
        self.created_at = now;
        self.push_status(OrderStatus::Pending, now, Some(CREATED_NOTE.to_string()));
        self.requested.clear();
        self.promo_code = None;
        Ok(())
    }

    async fn after_create(&self, ctx: &OrderContext) -> Result<(), OrderError> {
        if let Some(applied) = &self.promo {
            let usage = UsageRecord {
                user_id: self.customer.id.clone(),
                order_id: self.id,
                discount_applied: applied.amount,
            };
            ctx.promos.record_usage(applied.promo_id, usage).await?;
        }
        info!(
            order_number = %self.order_number,
            total = self.total,
            "Order created"
        );
        Ok(())
    }

    async fn on_create_aborted(&self, ctx: &OrderContext) {
        if self.items.is_empty() {
            return;
        }
        warn!(order_id = %self.id, "Order creation aborted, releasing stock");
        if let Err(e) = ctx.inventory.restore(self.stock_lines()).await {
            error!(order_id = %self.id, error = %e, "Failed to release stock");
        }
    }

    async fn on_update(&mut self, update: OrderUpdate, ctx: &OrderContext) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::OrderClosed { status: self.status });
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
            self.updated_at = ctx.clock.now();
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        let now = ctx.clock.now();
        let change = match action {
            OrderAction::Transition { target, note } => {
                let from = self.status;
                let effects = transitions::effects(from, target)?;
                if effects.contains(&Effect::RestoreStock) {
                    ctx.inventory.restore(self.stock_lines()).await?;
                }
                if effects.contains(&Effect::StampDelivered) {
                    self.delivered_at = Some(now);
                }
                self.push_status(target, now, note);
                OrderChange::Transitioned {
                    from,
                    to: target,
                    effects,
                }
            }
            OrderAction::AssignPreparer(preparer) => {
                if self.status.is_terminal() {
                    return Err(OrderError::OrderClosed { status: self.status });
                }
                self.assigned_preparer_id = Some(preparer.clone());
                self.updated_at = now;
                OrderChange::PreparerAssigned(preparer)
            }
            OrderAction::AssignCourier(courier) => {
                if self.status.is_terminal() {
                    return Err(OrderError::OrderClosed { status: self.status });
                }
                self.assigned_courier_id = Some(courier.clone());
                self.updated_at = now;
                OrderChange::CourierAssigned(courier)
            }
        };
        Ok(OrderActionResult {
            order: self.clone(),
            change,
        })
    }

    async fn after_action(&self, result: &OrderActionResult, ctx: &OrderContext) {
        let notifier = ctx.notifier.as_ref();
        match &result.change {
            OrderChange::Transitioned { from, to, effects } => {
                info!(order_number = %self.order_number, %from, %to, "Order status changed");
                for effect in *effects {
                    let notification = match effect {
                        Effect::NotifyCustomer => Some(status_notification(
                            self,
                            self.customer.id.clone(),
                            *to,
                            "/my-orders",
                        )),
                        Effect::NotifyPreparer => self
                            .assigned_preparer_id
                            .clone()
                            .map(|p| status_notification(self, p, *to, "/chef-dashboard")),
                        Effect::NotifyCourier => self
                            .assigned_courier_id
                            .clone()
                            .map(|c| status_notification(self, c, *to, "/livreur-dashboard")),
                        Effect::RestoreStock | Effect::StampDelivered => None,
                    };
                    if let Some(notification) = notification {
                        emit_quietly(notifier, notification).await;
                    }
                }
            }
            OrderChange::PreparerAssigned(preparer) => {
                let n = assignment_notification(self, preparer.clone(), "préparateur", "/chef-dashboard");
                emit_quietly(notifier, n).await;
            }
            OrderChange::CourierAssigned(courier) => {
                let n = assignment_notification(self, courier.clone(), "livreur", "/livreur-dashboard");
                emit_quietly(notifier, n).await;
            }
        }
    }

    /// The transition could not be persisted: take back the stock that was restored for it.
    async fn on_action_aborted(&self, result: &OrderActionResult, ctx: &OrderContext) {
        if let OrderChange::Transitioned { effects, .. } = &result.change {
            if effects.contains(&Effect::RestoreStock) {
                if let Err(e) = ctx.inventory.reserve(self.stock_lines()).await {
                    error!(order_id = %self.id, error = %e, "Failed to re-reserve stock");
                }
            }
        }
    }

    async fn handle_batch(
        _records: &Records<Self>,
        batch: Infallible,
        _ctx: &OrderContext,
    ) -> Result<BatchOutcome<Self>, OrderError> {
        match batch {}
    }
}
