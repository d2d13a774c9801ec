//! # Order Lifecycle
//!
//! Checkout validation, the immutable order snapshot, the forward-only
//! status graph and the loyalty award hook.
//!
//! ## Status Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──► confirmed ──► preparing ──► ready ──► completed           │
//! │      │            │             │                                       │
//! │      └────────────┴─────────────┴──────► cancelled                      │
//! │                                                                         │
//! │   completed and cancelled are terminal; ready cannot be cancelled       │
//! │   (the kitchen already plated it). No other edge is legal.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `Order.items` is a frozen copy of the cart lines at checkout time.
//! Catalog price changes after checkout must never reprice a placed order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::error::{DomainError, DomainResult};
use crate::loyalty::{LoyaltyAccount, LoyaltyTransactionKind};
use crate::money::Money;
use crate::types::{DeliveryType, OrderStatus, PaymentMethod, PaymentStatus};
use crate::POINTS_PER_MAJOR_UNIT;

// =============================================================================
// Order Line
// =============================================================================

/// A line item in an order.
/// Frozen snapshot of a cart line at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub modifiers: Vec<crate::types::Modifier>,
    pub notes: String,
    /// `(unitPrice + Σ modifier.price) × quantity`, frozen.
    pub line_subtotal: Money,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        OrderLine {
            item_id: line.item_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            modifiers: line.modifiers.clone(),
            notes: line.notes.clone(),
            line_subtotal: line.line_subtotal(),
        }
    }
}

// =============================================================================
// Checkout Details
// =============================================================================

/// Per-delivery-type details collected on the checkout screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    /// Account placing the order; `None` for guest checkout (no loyalty).
    pub customer_id: Option<String>,
    /// Required when `deliveryType = delivery`.
    pub delivery_address: Option<String>,
    /// Required when `deliveryType = dine-in`.
    pub table_id: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
///
/// Created by [`Order::create`] from a cart snapshot; afterwards only
/// [`Order::transition`] produces new versions of it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Immutable snapshot of the cart lines at checkout time.
    pub items: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub status: OrderStatus,
    pub delivery_type: DeliveryType,
    pub delivery_address: Option<String>,
    pub table_id: Option<String>,
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates an order from the cart.
    ///
    /// Recalculates the cart totals before freezing them - checkout never
    /// trusts whatever derived fields the caller's snapshot carried.
    ///
    /// ## Errors
    /// - `EmptyCart` when the cart has no lines
    /// - `MissingDeliveryDetails` when `delivery` has no address or
    ///   `dine-in` has no table
    pub fn create(
        cart: &Cart,
        delivery_type: DeliveryType,
        payment_method: PaymentMethod,
        details: CheckoutDetails,
    ) -> DomainResult<Order> {
        let mut cart = cart.clone();
        cart.recalculate();

        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let delivery_address = details.delivery_address.filter(|a| !a.trim().is_empty());
        let table_id = details.table_id.filter(|t| !t.trim().is_empty());
        match delivery_type {
            DeliveryType::Delivery if delivery_address.is_none() => {
                return Err(DomainError::MissingDeliveryDetails {
                    missing: "delivery address",
                });
            }
            DeliveryType::DineIn if table_id.is_none() => {
                return Err(DomainError::MissingDeliveryDetails { missing: "table" });
            }
            _ => {}
        }

        // Online payments are captured at checkout; everything else
        // settles later (courier, counter, terminal).
        let payment_status = if payment_method == PaymentMethod::Online {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        };

        Ok(Order {
            id: Uuid::new_v4().to_string(),
            items: cart.lines.iter().map(OrderLine::from).collect(),
            subtotal: cart.subtotal,
            tax: cart.tax,
            discount: cart.discount,
            delivery_fee: cart.delivery_fee,
            total: cart.total,
            status: OrderStatus::Pending,
            delivery_type,
            delivery_address,
            table_id,
            customer_id: details.customer_id,
            payment_method,
            payment_status,
            created_at: Utc::now(),
            completed_at: None,
        })
    }

    /// Applies a status transition, returning the updated order.
    ///
    /// Legal only along the forward-only graph; everything else -
    /// including any attempt to leave `completed` or `cancelled` - fails
    /// with `IllegalTransition`.
    pub fn transition(&self, target: OrderStatus) -> DomainResult<Order> {
        use OrderStatus::*;

        let legal = matches!(
            (self.status, target),
            (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, Ready)
                | (Ready, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Preparing, Cancelled)
        );
        if !legal {
            return Err(DomainError::IllegalTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }

        let mut next = self.clone();
        next.status = target;
        if target == Completed {
            next.completed_at = Some(Utc::now());
        }
        Ok(next)
    }

    /// Loyalty points this order earns:
    /// `floor(total in major units × POINTS_PER_MAJOR_UNIT)`.
    pub fn points_earned(&self) -> i64 {
        self.total.major_units() * POINTS_PER_MAJOR_UNIT
    }

    /// Awards this order's points to the account, at most once.
    ///
    /// The order id is the idempotency key: a retried call (at-least-once
    /// delivery from the caller) finds the existing transaction and
    /// records nothing. Returns whether a transaction was appended.
    pub fn award_loyalty(&self, account: &mut LoyaltyAccount) -> DomainResult<bool> {
        let points = self.points_earned();
        if points <= 0 {
            return Ok(false);
        }
        account.idempotent_record(
            &self.id,
            LoyaltyTransactionKind::Earned,
            points,
            &format!("Points for order {}", self.id),
            Some(self.id.clone()),
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
