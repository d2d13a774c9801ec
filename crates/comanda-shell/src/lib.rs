//! # comanda-shell: UI-Shell Support
//!
//! Pieces the client shell consumes that have no monetary or ordering
//! invariants - deliberately outside the engine:
//!
//! - [`routing`] - the pure session router: `route_for(session)` replaces
//!   the old multi-branch redirect logic with one total function the UI
//!   shell consumes
//! - [`pos`] - the `PosAdapter` capability interface for vendor POS/TPV
//!   integrations, plus the current stub vendors

pub mod pos;
pub mod routing;

pub use pos::{CloudTpv, MenuSyncReport, NullPos, PosAdapter, PosError, PosResult, PosTicket};
pub use routing::{route_for, Destination, SessionState};
