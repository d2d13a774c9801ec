//! # Domain Types
//!
//! Shared domain types used throughout the Comanda engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │   OrderStatus   │   │    TimeSlot     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  Pending        │   │  "13:30"        │       │
//! │  │  price: Money   │   │  → Confirmed    │   │  fixed set of   │       │
//! │  │  modifiers      │   │  → Preparing    │   │  service slots  │       │
//! │  │  available      │   │  → Ready        │   │  (no freeform   │       │
//! │  └─────────────────┘   │  → Completed    │   │   timestamps)   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Component-specific types live with their component:                    │
//! │  CartLine (cart), Order (order), Reservation (table),                   │
//! │  LoyaltyAccount (loyalty), Promotion (promotion).                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The serde shapes below are the store/UI contract: field names render in
//! camelCase, enum values in the lowercase/kebab-case spelling the stored
//! documents use (`"dine-in"`, `"no-show"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (the product's default VAT rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (configuration convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// An optional extra attached to a menu item (e.g. "extra cheese").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub id: String,
    pub name: String,
    /// Price delta added to the unit price; may be zero.
    pub price: Money,
}

/// A menu item as read from the catalog.
///
/// Read-only input to the cart: the cart freezes `name` and `price` at the
/// moment the line is added, so later catalog edits never reprice a cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Modifiers the item offers; the cart records the chosen subset.
    pub modifiers: Vec<Modifier>,
    /// Whether the kitchen is currently serving this item.
    pub available: bool,
}

/// A catalog category (soft-ordered section of the menu).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub active: bool,
}

// =============================================================================
// Delivery & Payment
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryType {
    /// Courier delivery; requires a delivery address.
    Delivery,
    /// Served at a table; requires a table identifier.
    DineIn,
    /// Collected at the counter; no extra details.
    Pickup,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery/at the counter.
    Cash,
    /// Card on a physical terminal.
    Card,
    /// Paid online at checkout time.
    Online,
}

/// Settlement state of an order's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Forward-only: `pending → confirmed → preparing → ready → completed`,
/// with `cancelled` reachable from the first three steps only. The legal
/// edges live in [`crate::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting restaurant confirmation.
    Pending,
    /// Accepted by the restaurant.
    Confirmed,
    /// In the kitchen.
    Preparing,
    /// Ready for pickup/serving/courier.
    Ready,
    /// Delivered/served; terminal.
    Completed,
    /// Abandoned before it was ready; terminal.
    Cancelled,
}

impl OrderStatus {
    /// Stable lowercase name, matching the stored document value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Reservation Status
// =============================================================================

/// The status of a table reservation.
///
/// `pending → confirmed → seated → completed`, with `cancelled` and
/// `no-show` reachable from `pending`/`confirmed` only. The legal edges
/// live in [`crate::table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Stable kebab-case name, matching the stored document value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "no-show",
        }
    }

    /// Whether a reservation in this status keeps its table occupied.
    ///
    /// Cancelled and no-show reservations release the table; every other
    /// status blocks it for the slot.
    pub const fn blocks_table(&self) -> bool {
        !matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::NoShow
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

// =============================================================================
// Time Slot
// =============================================================================

/// A reservation time from the fixed service grid.
///
/// Reservations are slot-based, never freeform timestamps: lunch service
/// runs 12:00-15:00 and dinner 19:00-22:30, on the half hour. The wire
/// value is the "HH:MM" label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TimeSlot {
    #[serde(rename = "12:00")]
    Lunch1200,
    #[serde(rename = "12:30")]
    Lunch1230,
    #[serde(rename = "13:00")]
    Lunch1300,
    #[serde(rename = "13:30")]
    Lunch1330,
    #[serde(rename = "14:00")]
    Lunch1400,
    #[serde(rename = "14:30")]
    Lunch1430,
    #[serde(rename = "15:00")]
    Lunch1500,
    #[serde(rename = "19:00")]
    Dinner1900,
    #[serde(rename = "19:30")]
    Dinner1930,
    #[serde(rename = "20:00")]
    Dinner2000,
    #[serde(rename = "20:30")]
    Dinner2030,
    #[serde(rename = "21:00")]
    Dinner2100,
    #[serde(rename = "21:30")]
    Dinner2130,
    #[serde(rename = "22:00")]
    Dinner2200,
    #[serde(rename = "22:30")]
    Dinner2230,
}

impl TimeSlot {
    /// Every bookable slot, in service order.
    pub const ALL: [TimeSlot; 15] = [
        TimeSlot::Lunch1200,
        TimeSlot::Lunch1230,
        TimeSlot::Lunch1300,
        TimeSlot::Lunch1330,
        TimeSlot::Lunch1400,
        TimeSlot::Lunch1430,
        TimeSlot::Lunch1500,
        TimeSlot::Dinner1900,
        TimeSlot::Dinner1930,
        TimeSlot::Dinner2000,
        TimeSlot::Dinner2030,
        TimeSlot::Dinner2100,
        TimeSlot::Dinner2130,
        TimeSlot::Dinner2200,
        TimeSlot::Dinner2230,
    ];

    /// The "HH:MM" label shown to diners and stored in documents.
    pub const fn label(&self) -> &'static str {
        match self {
            TimeSlot::Lunch1200 => "12:00",
            TimeSlot::Lunch1230 => "12:30",
            TimeSlot::Lunch1300 => "13:00",
            TimeSlot::Lunch1330 => "13:30",
            TimeSlot::Lunch1400 => "14:00",
            TimeSlot::Lunch1430 => "14:30",
            TimeSlot::Lunch1500 => "15:00",
            TimeSlot::Dinner1900 => "19:00",
            TimeSlot::Dinner1930 => "19:30",
            TimeSlot::Dinner2000 => "20:00",
            TimeSlot::Dinner2030 => "20:30",
            TimeSlot::Dinner2100 => "21:00",
            TimeSlot::Dinner2130 => "21:30",
            TimeSlot::Dinner2200 => "22:00",
            TimeSlot::Dinner2230 => "22:30",
        }
    }

    /// Parses a "HH:MM" label back into a slot.
    pub fn from_label(label: &str) -> Option<TimeSlot> {
        TimeSlot::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Users
// =============================================================================

/// Role classification supplied by the identity provider.
///
/// Opaque to the engine: roles decide which screens a session may reach
/// (see `comanda-shell`), never pricing or lifecycle behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Waiter,
    Kitchen,
    Admin,
}

/// Profile record from the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub role: Option<Role>,
}

// =============================================================================
// Unit Tests
// =============================================================================
