//! # User Resolution
//!
//! Picks the identity whose carts the condition inspects.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Session { contact_id, authenticated }                                  │
//! │       │                                                                 │
//! │       ├── not authenticated ─────────────────► contact_id               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  IdentityLookup::get_user(contact_id)                                   │
//! │       │                                                                 │
//! │       ├── Ok(Some(customer)) ────────────────► customer.external_id     │
//! │       ├── Ok(None) ──────────────────────────► contact_id               │
//! │       └── Err(e) ──► warn! ──────────────────► contact_id               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution never fails. A broken identity service degrades to the
//! anonymous identity instead of aborting the evaluation.

use std::fmt;
use std::sync::Arc;

use cartrule_core::Session;
use tracing::{debug, warn};

use crate::lookup::IdentityLookup;

/// Resolves the effective user id for a session.
#[derive(Clone)]
pub struct UserResolver {
    identities: Arc<dyn IdentityLookup>,
}

impl UserResolver {
    pub fn new(identities: Arc<dyn IdentityLookup>) -> Self {
        UserResolver { identities }
    }

    /// Returns the customer's external id for a logged-in session whose
    /// customer record resolves, and the anonymous contact id otherwise.
    pub fn resolve_user_id(&self, session: &Session) -> String {
        let anonymous_id = session.contact_id.as_str();

        if !session.authenticated {
            return anonymous_id.to_string();
        }

        match self.identities.get_user(anonymous_id) {
            Ok(Some(customer)) if !customer.external_id.is_empty() => {
                debug!(
                    contact_id = %anonymous_id,
                    external_id = %customer.external_id,
                    "Resolved authenticated customer"
                );
                customer.external_id
            }
            Ok(_) => {
                debug!(contact_id = %anonymous_id, "No customer record, using anonymous identity");
                anonymous_id.to_string()
            }
            Err(e) => {
                warn!(
                    contact_id = %anonymous_id,
                    error = %e,
                    "Identity lookup failed, using anonymous identity"
                );
                anonymous_id.to_string()
            }
        }
    }
}

impl fmt::Debug for UserResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserResolver").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
