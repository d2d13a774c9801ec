//! # POS Vendor Adapters
//!
//! The capability interface for in-restaurant POS/TPV systems, and the
//! vendor implementations behind it.
//!
//! ## Vendor Seam
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backoffice flows ──► dyn PosAdapter ──► { NullPos, CloudTpv, … }       │
//! │                                                                         │
//! │  syncMenu      push the catalog to the vendor                           │
//! │  sendOrder     forward a placed order to the in-house terminal          │
//! │  getOrderStatus / cancelOrder   follow up on a forwarded order          │
//! │                                                                         │
//! │  No vendor integration is live yet: every adapter below returns         │
//! │  canned values. The trait is the contract a real integration will       │
//! │  implement; callers are written against it, not against a vendor.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use comanda_core::{MenuItem, Order, OrderStatus};

// =============================================================================
// Errors
// =============================================================================

/// Vendor adapter errors.
#[derive(Debug, Error)]
pub enum PosError {
    /// The adapter is missing credentials/endpoint configuration.
    #[error("POS vendor '{0}' is not configured")]
    NotConfigured(&'static str),

    /// The vendor rejected or failed the request.
    #[error("POS vendor '{vendor}' error: {message}")]
    Vendor {
        vendor: &'static str,
        message: String,
    },

    /// The ticket does not belong to this adapter.
    #[error("Ticket {reference} was not issued by vendor '{vendor}'")]
    ForeignTicket {
        vendor: &'static str,
        reference: String,
    },
}

/// Convenience type alias for Results with PosError.
pub type PosResult<T> = Result<T, PosError>;

// =============================================================================
// Capability Interface
// =============================================================================

/// Handle a vendor returns for a forwarded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosTicket {
    /// Which adapter issued the ticket.
    pub vendor: String,
    /// Vendor-side reference for the order.
    pub reference: String,
}

/// Outcome of a menu push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSyncReport {
    pub vendor: String,
    /// Items accepted by the vendor.
    pub pushed: usize,
    /// Items the vendor skipped (unsupported modifiers, etc.).
    pub skipped: usize,
}

/// Capability interface every vendor POS integration implements.
#[async_trait]
pub trait PosAdapter: Send + Sync {
    /// Stable vendor identifier.
    fn vendor(&self) -> &'static str;

    /// Pushes the catalog to the vendor system.
    async fn sync_menu(&self, items: &[MenuItem]) -> PosResult<MenuSyncReport>;

    /// Forwards a placed order to the vendor terminal.
    async fn send_order(&self, order: &Order) -> PosResult<PosTicket>;

    /// Reads the vendor-side status of a forwarded order.
    async fn get_order_status(&self, ticket: &PosTicket) -> PosResult<OrderStatus>;

    /// Cancels a forwarded order on the vendor side.
    async fn cancel_order(&self, ticket: &PosTicket) -> PosResult<()>;
}

// =============================================================================
// Null Adapter
// =============================================================================

/// The no-op adapter used when a restaurant has no POS integration.
///
/// Accepts everything and reports orders as confirmed so the rest of the
/// backoffice flow behaves as if a vendor acknowledged instantly.
#[derive(Debug, Default, Clone)]
pub struct NullPos;

const NULL_VENDOR: &str = "null";

#[async_trait]
impl PosAdapter for NullPos {
    fn vendor(&self) -> &'static str {
        NULL_VENDOR
    }

    async fn sync_menu(&self, items: &[MenuItem]) -> PosResult<MenuSyncReport> {
        debug!(count = items.len(), "null POS menu sync");
        Ok(MenuSyncReport {
            vendor: NULL_VENDOR.to_string(),
            pushed: items.len(),
            skipped: 0,
        })
    }

    async fn send_order(&self, order: &Order) -> PosResult<PosTicket> {
        debug!(order = %order.id, "null POS order forward");
        Ok(PosTicket {
            vendor: NULL_VENDOR.to_string(),
            reference: order.id.clone(),
        })
    }

    async fn get_order_status(&self, ticket: &PosTicket) -> PosResult<OrderStatus> {
        self.check_ticket(ticket)?;
        Ok(OrderStatus::Confirmed)
    }

    async fn cancel_order(&self, ticket: &PosTicket) -> PosResult<()> {
        self.check_ticket(ticket)?;
        Ok(())
    }
}

impl NullPos {
    fn check_ticket(&self, ticket: &PosTicket) -> PosResult<()> {
        if ticket.vendor != NULL_VENDOR {
            return Err(PosError::ForeignTicket {
                vendor: NULL_VENDOR,
                reference: ticket.reference.clone(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// CloudTpv Adapter (stub)
// =============================================================================

/// Stub for the CloudTpv terminal integration.
///
/// The real protocol is not wired up yet; like the other vendor stubs it
/// returns canned values so the backoffice screens can be built against
/// the final shape.
#[derive(Debug, Clone)]
pub struct CloudTpv {
    /// Terminal identifier from the restaurant's CloudTpv account.
    pub terminal_id: String,
}

const CLOUD_TPV_VENDOR: &str = "cloudtpv";

#[async_trait]
impl PosAdapter for CloudTpv {
    fn vendor(&self) -> &'static str {
        CLOUD_TPV_VENDOR
    }

    async fn sync_menu(&self, items: &[MenuItem]) -> PosResult<MenuSyncReport> {
        if self.terminal_id.is_empty() {
            return Err(PosError::NotConfigured(CLOUD_TPV_VENDOR));
        }
        debug!(terminal = %self.terminal_id, count = items.len(), "CloudTpv menu sync (stub)");
        // TODO: speak the real CloudTpv catalog API once credentials exist.
        Ok(MenuSyncReport {
            vendor: CLOUD_TPV_VENDOR.to_string(),
            pushed: items.len(),
            skipped: 0,
        })
    }

    async fn send_order(&self, order: &Order) -> PosResult<PosTicket> {
        if self.terminal_id.is_empty() {
            return Err(PosError::NotConfigured(CLOUD_TPV_VENDOR));
        }
        debug!(terminal = %self.terminal_id, order = %order.id, "CloudTpv order forward (stub)");
        Ok(PosTicket {
            vendor: CLOUD_TPV_VENDOR.to_string(),
            reference: format!("{}-{}", self.terminal_id, order.id),
        })
    }

    async fn get_order_status(&self, ticket: &PosTicket) -> PosResult<OrderStatus> {
        if ticket.vendor != CLOUD_TPV_VENDOR {
            return Err(PosError::ForeignTicket {
                vendor: CLOUD_TPV_VENDOR,
                reference: ticket.reference.clone(),
            });
        }
        Ok(OrderStatus::Preparing)
    }

    async fn cancel_order(&self, ticket: &PosTicket) -> PosResult<()> {
        if ticket.vendor != CLOUD_TPV_VENDOR {
            return Err(PosError::ForeignTicket {
                vendor: CLOUD_TPV_VENDOR,
                reference: ticket.reference.clone(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use comanda_core::{
        Cart, CheckoutDetails, Currency, DeliveryType, Money, PaymentMethod, Rate,
    };

    fn sample_order() -> Order {
        let mut cart = Cart::new(Currency::Eur, Rate::from_bps(1000));
        let item = MenuItem {
            id: "bravas".to_string(),
            name: "Patatas bravas".to_string(),
            price: Money::new(650, Currency::Eur),
            modifiers: Vec::new(),
            available: true,
        };
        cart.add_item(&item, 1, vec![], "").unwrap();
        Order::create(
            &cart,
            DeliveryType::Pickup,
            PaymentMethod::Cash,
            CheckoutDetails::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_null_pos_round_trip() {
        let pos = NullPos;
        let order = sample_order();

        let report = pos.sync_menu(&[]).await.unwrap();
        assert_eq!(report.pushed, 0);

        let ticket = pos.send_order(&order).await.unwrap();
        assert_eq!(ticket.reference, order.id);

        assert_eq!(
            pos.get_order_status(&ticket).await.unwrap(),
            OrderStatus::Confirmed
        );
        pos.cancel_order(&ticket).await.unwrap();
    }

    #[tokio::test]
    async fn test_cloud_tpv_requires_terminal() {
        let pos = CloudTpv {
            terminal_id: String::new(),
        };
        let err = pos.send_order(&sample_order()).await.unwrap_err();
        assert!(matches!(err, PosError::NotConfigured("cloudtpv")));
    }

    #[tokio::test]
    async fn test_cloud_tpv_stub_values() {
        let pos = CloudTpv {
            terminal_id: "term-9".to_string(),
        };
        let order = sample_order();

        let ticket = pos.send_order(&order).await.unwrap();
        assert!(ticket.reference.starts_with("term-9-"));
        assert_eq!(
            pos.get_order_status(&ticket).await.unwrap(),
            OrderStatus::Preparing
        );
    }

    #[tokio::test]
    async fn test_foreign_tickets_rejected() {
        let pos = NullPos;
        let foreign = PosTicket {
            vendor: "cloudtpv".to_string(),
            reference: "x".to_string(),
        };
        assert!(matches!(
            pos.get_order_status(&foreign).await.unwrap_err(),
            PosError::ForeignTicket { .. }
        ));
    }
}
