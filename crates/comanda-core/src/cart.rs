//! # Cart Engine
//!
//! Owns the client-side shopping cart: line merge rules, per-line
//! subtotals and the aggregate totals invariant.
//!
//! ## Totals Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lineSubtotal = (unitPrice + Σ modifier.price) × quantity               │
//! │  subtotal     = Σ lineSubtotal                                          │
//! │  tax          = subtotal × taxRate   (half-to-even at the minor unit)   │
//! │  total        = subtotal + tax − discount + deliveryFee, clamped ≥ 0    │
//! │                                                                         │
//! │  recalculate() is the ONLY writer of subtotal/tax/total/itemCount.      │
//! │  It runs after every mutation and after every restore from storage;     │
//! │  persisted totals are never trusted.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Merge Identity
//! Two additions merge into one line when they agree on
//! `(itemId, sorted(modifierIds), notes)` - the same dish with the same
//! extras and the same note is the same line, regardless of the order the
//! modifiers were ticked in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult, ValidationError};
use crate::money::{Currency, Money};
use crate::types::{MenuItem, Modifier, Rate};
use crate::validation;
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the shopping cart.
///
/// `name` and `unit_price` are frozen copies taken from the catalog at the
/// moment the line was added; later catalog edits never reprice a cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line identifier (UUID), stable across quantity edits.
    pub line_id: String,

    /// Catalog item this line refers to.
    pub item_id: String,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in cart, always > 0.
    pub quantity: i64,

    /// Chosen modifiers, part of the line's merge identity.
    pub modifiers: Vec<Modifier>,

    /// Free-text note for the kitchen ("sin cebolla"). Part of the
    /// merge identity: a different note is a different line.
    pub notes: String,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Unit price including the chosen modifiers.
    ///
    /// All prices in a line share the cart currency (enforced when the
    /// line is added), so the sum cannot mismatch.
    pub fn unit_price_with_modifiers(&self) -> Money {
        let minor = self.unit_price.minor_units()
            + self
                .modifiers
                .iter()
                .map(|m| m.price.minor_units())
                .sum::<i64>();
        Money::new(minor, self.unit_price.currency())
    }

    /// Line subtotal: `(unitPrice + Σ modifier.price) × quantity`.
    pub fn line_subtotal(&self) -> Money {
        self.unit_price_with_modifiers()
            .multiply_quantity(self.quantity)
    }

    /// Whether this line merges with an addition of the given identity.
    ///
    /// `modifier_ids` must already be sorted.
    fn matches_identity(&self, item_id: &str, sorted_modifier_ids: &[String], notes: &str) -> bool {
        if self.item_id != item_id || self.notes != notes {
            return false;
        }
        let mut own: Vec<&str> = self.modifiers.iter().map(|m| m.id.as_str()).collect();
        own.sort_unstable();
        own.len() == sorted_modifier_ids.len()
            && own
                .iter()
                .zip(sorted_modifier_ids.iter())
                .all(|(a, b)| *a == b.as_str())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart, exclusively owned by one client session.
///
/// ## Invariants
/// - Lines are unique by `(itemId, sorted(modifierIds), notes)`
/// - Quantity is always > 0 (setting it to 0 removes the line)
/// - All monetary values share `currency`
/// - `subtotal`/`tax`/`total`/`item_count` are derived: only
///   [`Cart::recalculate`] writes them
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Currency every amount in this cart is denominated in.
    pub currency: Currency,

    /// Tax rate applied to the subtotal.
    pub tax_rate: Rate,

    /// Lines in the cart.
    pub lines: Vec<CartLine>,

    /// Cart-level discount (promotion or manual), subtracted from the total.
    pub discount: Money,

    /// Delivery fee added to the total.
    pub delivery_fee: Money,

    /// Derived: sum of line subtotals.
    pub subtotal: Money,

    /// Derived: tax on the subtotal.
    pub tax: Money,

    /// Derived: grand total, never negative.
    pub total: Money,

    /// Derived: total quantity across all lines (the cart badge number).
    pub item_count: i64,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new(currency: Currency, tax_rate: Rate) -> Self {
        Cart {
            currency,
            tax_rate,
            lines: Vec::new(),
            discount: Money::zero(currency),
            delivery_fee: Money::zero(currency),
            subtotal: Money::zero(currency),
            tax: Money::zero(currency),
            total: Money::zero(currency),
            item_count: 0,
        }
    }

    /// Adds a catalog item to the cart, merging with an existing line when
    /// the `(itemId, modifiers, notes)` identity matches.
    ///
    /// ## Errors
    /// - `InvalidQuantity` when `quantity <= 0`
    /// - `CurrencyMismatch` when the item or a modifier is priced in a
    ///   different currency than the cart
    /// - Validation errors for oversized notes, quantities or carts
    pub fn add_item(
        &mut self,
        item: &MenuItem,
        quantity: i64,
        modifiers: Vec<Modifier>,
        notes: &str,
    ) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::InvalidQuantity {
                requested: quantity,
            });
        }
        validation::validate_quantity(quantity)?;
        validation::validate_note(notes)?;
        self.require_cart_currency(item.price)?;
        for modifier in &modifiers {
            self.require_cart_currency(modifier.price)?;
        }

        let mut sorted_ids: Vec<String> = modifiers.iter().map(|m| m.id.clone()).collect();
        sorted_ids.sort_unstable();

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.matches_identity(&item.id, &sorted_ids, notes))
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: MAX_LINE_QUANTITY,
                }
                .into());
            }
            line.quantity = new_qty;
            self.recalculate();
            return Ok(());
        }

        validation::validate_cart_width(self.lines.len())?;

        self.lines.push(CartLine {
            line_id: Uuid::new_v4().to_string(),
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            modifiers,
            notes: notes.to_string(),
            added_at: Utc::now(),
        });
        self.recalculate();
        Ok(())
    }

    /// Removes a line by id. Absent ids are a no-op, not an error.
    pub fn remove_line(&mut self, line_id: &str) {
        self.lines.retain(|l| l.line_id != line_id);
        self.recalculate();
    }

    /// Sets a line's quantity. A quantity of zero or less removes the
    /// line; an absent id is a no-op.
    pub fn set_quantity(&mut self, line_id: &str, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            self.remove_line(line_id);
            return Ok(());
        }
        validation::validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) {
            line.quantity = quantity;
            self.recalculate();
        }
        Ok(())
    }

    /// Replaces the cart-level discount.
    ///
    /// ## Errors
    /// `CurrencyMismatch` for a foreign-currency amount; negative amounts
    /// are rejected (clear a discount by applying zero).
    pub fn apply_discount(&mut self, amount: Money) -> DomainResult<()> {
        self.require_cart_currency(amount)?;
        validation::validate_amount_minor_units("discount", amount.minor_units())?;
        self.discount = amount;
        self.recalculate();
        Ok(())
    }

    /// Replaces the delivery fee.
    pub fn set_delivery_fee(&mut self, amount: Money) -> DomainResult<()> {
        self.require_cart_currency(amount)?;
        validation::validate_amount_minor_units("deliveryFee", amount.minor_units())?;
        self.delivery_fee = amount;
        self.recalculate();
        Ok(())
    }

    /// Recomputes every derived field from `lines`, `discount` and
    /// `delivery_fee`.
    ///
    /// Idempotent: running it twice produces the same cart. Every mutator
    /// calls it, and it must also run after restoring a cart from
    /// persisted state - stored totals are never trusted.
    pub fn recalculate(&mut self) {
        let subtotal_minor: i64 = self.lines.iter().map(|l| l.line_subtotal().minor_units()).sum();
        self.subtotal = Money::new(subtotal_minor, self.currency);
        self.tax = self.subtotal.percentage(self.tax_rate);

        let total_minor = self.subtotal.minor_units() + self.tax.minor_units()
            - self.discount.minor_units()
            + self.delivery_fee.minor_units();
        self.total = Money::new(total_minor, self.currency).clamp_non_negative();

        self.item_count = self.lines.iter().map(|l| l.quantity).sum();
    }

    /// Resets the cart to empty, keeping currency and tax rate.
    ///
    /// Called after a successful checkout and by the explicit
    /// "empty cart" action.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = Money::zero(self.currency);
        self.delivery_fee = Money::zero(self.currency);
        self.recalculate();
    }

    /// Finalizes a cart deserialized from session storage.
    ///
    /// The stored document is restored verbatim and the derived totals are
    /// recomputed - whatever totals were persisted are discarded.
    pub fn restored(mut self) -> Cart {
        self.recalculate();
        self
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn require_cart_currency(&self, amount: Money) -> DomainResult<()> {
        if amount.currency() != self.currency {
            return Err(DomainError::CurrencyMismatch {
                left: self.currency,
                right: amount.currency(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
