use crate::model::{Amount, DishId, OrderId, PromoId, StockLine, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Lifecycle states of an order.
///
/// ```text
/// pending -> confirmed -> preparing -> ready -> delivering -> delivered
///    |           |
///    +-----------+--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivering,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Customer-facing message, also the default history note.
    pub fn message(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Commande en attente de confirmation",
            OrderStatus::Confirmed => "Commande confirmée",
            OrderStatus::Preparing => "Commande en préparation",
            OrderStatus::Ready => "Commande prête",
            OrderStatus::Delivering => "Commande en cours de livraison",
            OrderStatus::Delivered => "Commande livrée",
            OrderStatus::Cancelled => "Commande annulée",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// How the customer intends to pay. Recorded only, never charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Mobile,
    Card,
    Cash,
}

/// Customer details frozen at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: UserId,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A dish and quantity as requested by the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub dish_id: DishId,
    pub quantity: u32,
}

impl LineRequest {
    pub fn new(dish_id: impl Into<DishId>, quantity: u32) -> Self {
        Self {
            dish_id: dish_id.into(),
            quantity,
        }
    }
}

/// One priced line of an order. The price is never re-read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub dish_id: DishId,
    pub dish_name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: Amount,
}

impl OrderLine {
    pub fn line_total(&self) -> Amount {
        self.unit_price * Amount::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// The promo applied to an order, kept for audit and for usage recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromo {
    pub promo_id: PromoId,
    pub code: String,
    /// Amount taken off the subtotal or the delivery fee.
    pub amount: Amount,
}

/// Represents a customer order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
///
/// Everything describing the customer and the priced lines is a snapshot taken at creation.
/// Only the status, its history, the assignments and the notes change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer: CustomerSnapshot,
    pub items: Vec<OrderLine>,
    pub subtotal: Amount,
    pub discount: Amount,
    pub delivery_fee: Amount,
    /// Part of the zone fee waived by a free-delivery promo (already taken out of `delivery_fee`).
    pub delivery_fee_waived: Amount,
    pub total: Amount,
    pub payment_method: PaymentMethod,
    pub promo: Option<AppliedPromo>,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub status_history: Vec<StatusEntry>,
    pub assigned_preparer_id: Option<UserId>,
    pub assigned_courier_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    /// Lines as requested, kept until the order is priced.
    #[serde(skip)]
    pub(crate) requested: Vec<LineRequest>,
    #[serde(skip)]
    pub(crate) promo_code: Option<String>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: CustomerSnapshot,
    pub items: Vec<LineRequest>,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
    pub notes: Option<String>,
}

/// Editable part of an order.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub notes: Option<String>,
}

impl Order {
    /// Reservation lines for the inventory ledger.
    pub fn stock_lines(&self) -> Vec<StockLine> {
        self.items
            .iter()
            .map(|line| StockLine {
                dish_id: line.dish_id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    /// Appends a history entry and moves to `status`.
    pub(crate) fn push_status(&mut self, status: OrderStatus, at: DateTime<Utc>, note: Option<String>) {
        let note = note.unwrap_or_else(|| status.message().to_string());
        self.status = status;
        self.status_history.push(StatusEntry { status, at, note });
        self.updated_at = at;
    }
}
