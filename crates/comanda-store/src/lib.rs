//! # comanda-store: Document Store Adapter
//!
//! This crate maps the entities of `comanda-core` onto a remote document
//! database and back. It contains **no business logic**: every rule lives
//! in the engine, every effect lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Comanda Data Flow                                 │
//! │                                                                         │
//! │  Client app (screens)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   comanda-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │ DocumentStore │    │ Repositories  │    │ MemoryStore  │   │   │
//! │  │   │ (document.rs) │    │ (orders,      │    │ (memory.rs)  │   │   │
//! │  │   │               │    │  reservations,│    │              │   │   │
//! │  │   │ get/list/     │◄───│  loyalty,     │    │ tests stand  │   │   │
//! │  │   │ create/update │    │  promotions…) │    │ in for the   │   │   │
//! │  │   │ + subscribe   │    │               │    │ remote store │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Remote document database (driver outside this workspace)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`document`] - `Document`, the `DocumentStore` trait, collection names
//! - [`memory`] - In-memory `DocumentStore` used by tests
//! - [`error`] - Store error types
//! - [`catalog`] - Menu items and categories
//! - [`orders`] - Order persistence and status updates
//! - [`reservations`] - Tables, reservations and the conditional claim
//! - [`loyalty`] - Loyalty accounts and the idempotent award
//! - [`promotions`] - Promotion lookup and conditional redemption
//! - [`users`] - User profiles for the shell router
//! - [`sessions`] - Cart persistence at session boundaries

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod document;
pub mod error;
pub mod loyalty;
pub mod memory;
pub mod orders;
pub mod promotions;
pub mod reservations;
pub mod sessions;
pub mod users;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::CatalogRepository;
pub use document::{collections, Document, DocumentStore, FieldFilter, StoreEvent, StoreEventKind};
pub use error::{StoreError, StoreResult};
pub use loyalty::LoyaltyRepository;
pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use promotions::PromotionRepository;
pub use reservations::ReservationRepository;
pub use sessions::CartSessions;
pub use users::UserRepository;
