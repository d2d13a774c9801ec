//! # comanda-core: Pure Domain Engine for Comanda
//!
//! This crate is the **heart** of the Comanda ordering client. It contains
//! every computation with a real invariant - cart pricing, order lifecycle,
//! table allocation, the loyalty ledger and promotion validation - as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Comanda Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Client App (screens)                        │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Orders ──► Reservations   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌─────────────┐  │   │
//! │  │  │ money  │ │  cart  │ │ order  │ │ table  │ │ loyalty /   │  │   │
//! │  │  │ Money  │ │  Cart  │ │ Order  │ │ finder │ │ promotion   │  │   │
//! │  │  │ Rate   │ │ Lines  │ │ graph  │ │ slots  │ │ ledger      │  │   │
//! │  │  └────────┘ └────────┘ └────────┘ └────────┘ └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              comanda-store (document store adapter)             │   │
//! │  │        get/list/create/update/delete + conditional claim        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer minor-unit arithmetic (no floats!)
//! - [`types`] - Shared domain types (catalog, statuses, slots, users)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//! - [`cart`] - Cart lines, merge rules and the recalculation invariant
//! - [`order`] - Checkout, the forward-only status graph, loyalty award
//! - [`table`] - Table allocation and the reservation status graph
//! - [`loyalty`] - Append-only points ledger with tier progression
//! - [`promotion`] - Promotion code validation and benefit computation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every operation is snapshot-in, snapshot-out
//! 2. **No I/O**: Store, network and identity access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are currency-tagged minor units
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::money::{Currency, Money};
//! use comanda_core::types::Rate;
//!
//! // Create money from minor units (never from floats!)
//! let price = Money::new(1099, Currency::Eur); // 10.99 EUR
//!
//! // 10% VAT, rounded half to even at the minor unit
//! let tax = price.percentage(Rate::from_bps(1000));
//! assert_eq!(tax.minor_units(), 110);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod order;
pub mod promotion;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use comanda_core::Money` instead of
// `use comanda_core::money::Money`

pub use cart::{Cart, CartLine};
pub use error::{DomainError, DomainResult, ValidationError};
pub use loyalty::{tier_for, LoyaltyAccount, LoyaltyTransaction, LoyaltyTransactionKind, Tier};
pub use money::{Currency, Money};
pub use order::{CheckoutDetails, Order, OrderLine};
pub use promotion::{Promotion, PromotionBenefit, PromotionType};
pub use table::{find_available, Reservation, Table};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order documents a sane size.
pub const MAX_CART_LINES: usize = 50;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g. typing 100 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 99;

/// Maximum length of the free-text note attached to a cart line.
pub const MAX_NOTE_LENGTH: usize = 280;

/// Maximum party size accepted for a reservation request.
pub const MAX_PARTY_SIZE: i64 = 20;

/// Loyalty points earned per whole major currency unit of an order total.
///
/// `points_earned` floors at whole major units, so an order of 31.33 EUR
/// earns 31 points at the default rate.
pub const POINTS_PER_MAJOR_UNIT: i64 = 1;
