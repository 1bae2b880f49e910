//! # Collaborator Interfaces
//!
//! The two services the evaluator calls out to. Both are synchronous and may
//! block on I/O; the evaluator imposes no timeout or retry, so hosts that
//! need resilience wrap their implementation.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLookup                                                             │
//! │  ──────────                                                             │
//! │  list_carts(site, [user]) ──► Ok(vec![])   on zero results (not Err)   │
//! │  load_cart(site, id, user) ─► Ok(None)     when the cart has vanished  │
//! │  Any Err ───────────────────► fatal for the evaluation                 │
//! │                                                                         │
//! │  IdentityLookup                                                         │
//! │  ──────────────                                                         │
//! │  get_user(anonymous_id) ────► Ok(None)     for "not found"             │
//! │  Any Err ───────────────────► logged, anonymous id used instead        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cartrule_core::{Cart, CartRef, CustomerRecord, SiteContext};

use crate::error::LookupResult;

/// Cart storage as seen by the evaluator.
pub trait CartLookup: Send + Sync {
    /// Lists the carts owned by any of `user_ids` on `site`.
    ///
    /// References may be lightweight (no lines).
    fn list_carts(&self, site: &SiteContext, user_ids: &[String]) -> LookupResult<Vec<CartRef>>;

    /// Loads one cart with its full line detail.
    fn load_cart(
        &self,
        site: &SiteContext,
        cart_id: &str,
        user_id: &str,
    ) -> LookupResult<Option<Cart>>;
}

/// Resolves an anonymous contact to a known customer.
pub trait IdentityLookup: Send + Sync {
    fn get_user(&self, anonymous_id: &str) -> LookupResult<Option<CustomerRecord>>;
}
