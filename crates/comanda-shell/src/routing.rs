//! # Session Routing
//!
//! One pure function from session state to shell destination.
//!
//! ## Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  signed in?   verified?   role?          destination                    │
//! │  ──────────   ─────────   ─────────      ───────────                    │
//! │  no           -           -              Login                          │
//! │  yes          no          -              VerifyEmail                    │
//! │  yes          yes         none           RoleSelector                   │
//! │  yes          yes         client         ClientHome                     │
//! │  yes          yes         staff role     Backoffice                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The UI shell calls this on every auth/profile change and navigates to
//! whatever comes back; no screen carries its own redirect logic.

use serde::{Deserialize, Serialize};

use comanda_core::Role;

/// What the shell knows about the current session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub signed_in: bool,
    pub email_verified: bool,
    pub role: Option<Role>,
}

/// Where the shell should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    Login,
    VerifyEmail,
    RoleSelector,
    ClientHome,
    Backoffice,
}

/// Routes a session to its destination. Total: every state maps somewhere.
pub fn route_for(session: &SessionState) -> Destination {
    if !session.signed_in {
        return Destination::Login;
    }
    if !session.email_verified {
        return Destination::VerifyEmail;
    }
    match session.role {
        None => Destination::RoleSelector,
        Some(Role::Client) => Destination::ClientHome,
        Some(Role::Waiter) | Some(Role::Kitchen) | Some(Role::Admin) => Destination::Backoffice,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
