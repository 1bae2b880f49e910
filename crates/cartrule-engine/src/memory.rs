//! # In-Memory Collaborators
//!
//! Map-backed [`CartLookup`] and [`IdentityLookup`] implementations for
//! tests and for hosts that already hold cart state in process.
//!
//! ## Usage
//! ```rust
//! use cartrule_core::{Cart, CartLine, SiteContext};
//! use cartrule_engine::lookup::CartLookup;
//! use cartrule_engine::memory::InMemoryCartStore;
//!
//! let store = InMemoryCartStore::new();
//! store.insert("storefront", Cart::new("cart-1", "u-1").with_line(CartLine::new("SKU-1", 2)));
//!
//! let site = SiteContext::new("storefront");
//! let refs = store.list_carts(&site, &["u-1".to_string()]).unwrap();
//! assert_eq!(refs.len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use cartrule_core::{Cart, CartRef, CustomerRecord, SiteContext};
use tracing::debug;

use crate::error::{LookupError, LookupResult};
use crate::lookup::{CartLookup, IdentityLookup};

// =============================================================================
// Cart Store
// =============================================================================

#[derive(Debug, Default)]
struct SiteCarts {
    /// Listing order.
    refs: Vec<CartRef>,
    carts: HashMap<String, Cart>,
}

impl SiteCarts {
    /// Replaces the listed ref with the same cart id in place, or appends.
    fn put_ref(&mut self, cart_ref: CartRef) {
        match self.refs.iter_mut().find(|r| r.id == cart_ref.id) {
            Some(existing) => *existing = cart_ref,
            None => self.refs.push(cart_ref),
        }
    }
}

/// Carts grouped by site name.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    sites: RwLock<HashMap<String, SiteCarts>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) a cart on `site`.
    pub fn insert(&self, site: impl Into<String>, cart: Cart) {
        let mut sites = match self.sites.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = sites.entry(site.into()).or_default();

        entry.put_ref(cart.reference());
        entry.carts.insert(cart.id.clone(), cart);
    }

    /// Lists a cart reference whose cart cannot be loaded.
    ///
    /// Models a cart deleted between the list and load calls. A stored cart
    /// with the same id is dropped, so the reference is listed once and
    /// never hydrates.
    pub fn insert_dangling_ref(&self, site: impl Into<String>, cart_ref: CartRef) {
        let mut sites = match self.sites.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = sites.entry(site.into()).or_default();

        entry.carts.remove(&cart_ref.id);
        entry.put_ref(cart_ref);
    }

    /// Number of carts listed on `site`, dangling references included.
    pub fn len(&self, site: &str) -> usize {
        self.sites
            .read()
            .map(|sites| sites.get(site).map_or(0, |s| s.refs.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, site: &str) -> bool {
        self.len(site) == 0
    }
}

impl CartLookup for InMemoryCartStore {
    fn list_carts(&self, site: &SiteContext, user_ids: &[String]) -> LookupResult<Vec<CartRef>> {
        let sites = self
            .sites
            .read()
            .map_err(|_| LookupError::Unavailable("cart store lock poisoned".to_string()))?;

        let refs: Vec<CartRef> = sites
            .get(&site.name)
            .map(|s| {
                s.refs
                    .iter()
                    .filter(|r| user_ids.contains(&r.user_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(site = %site.name, count = refs.len(), "Listed carts");
        Ok(refs)
    }

    fn load_cart(
        &self,
        site: &SiteContext,
        cart_id: &str,
        user_id: &str,
    ) -> LookupResult<Option<Cart>> {
        let sites = self
            .sites
            .read()
            .map_err(|_| LookupError::Unavailable("cart store lock poisoned".to_string()))?;

        Ok(sites
            .get(&site.name)
            .and_then(|s| s.carts.get(cart_id))
            .filter(|cart| cart.user_id == user_id)
            .cloned())
    }
}

// =============================================================================
// Identity Directory
// =============================================================================

/// Anonymous contact id → customer record.
#[derive(Debug, Default)]
pub struct InMemoryIdentityDirectory {
    customers: RwLock<HashMap<String, CustomerRecord>>,
}

impl InMemoryIdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates an anonymous contact id with a customer.
    pub fn register(&self, anonymous_id: impl Into<String>, customer: CustomerRecord) {
        let mut customers = match self.customers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        customers.insert(anonymous_id.into(), customer);
    }
}

impl IdentityLookup for InMemoryIdentityDirectory {
    fn get_user(&self, anonymous_id: &str) -> LookupResult<Option<CustomerRecord>> {
        let customers = self
            .customers
            .read()
            .map_err(|_| LookupError::Unavailable("identity directory lock poisoned".to_string()))?;
        Ok(customers.get(anonymous_id).cloned())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cartrule_core::CartLine;

    fn site() -> SiteContext {
        SiteContext::new("storefront")
    }

    #[test]
    fn test_list_filters_by_user_and_site() {
        let store = InMemoryCartStore::new();
        store.insert("storefront", Cart::new("c-1", "alice"));
        store.insert("storefront", Cart::new("c-2", "bob"));
        store.insert("outlet", Cart::new("c-3", "alice"));

        let refs = store.list_carts(&site(), &["alice".to_string()]).unwrap();
        assert_eq!(refs, vec![CartRef::new("c-1", "alice")]);

        let none = store
            .list_carts(&SiteContext::new("unknown"), &["alice".to_string()])
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_insert_replaces_without_duplicate_ref() {
        let store = InMemoryCartStore::new();
        store.insert("storefront", Cart::new("c-1", "alice"));
        store.insert(
            "storefront",
            Cart::new("c-1", "alice").with_line(CartLine::new("SKU-1", 2)),
        );

        assert_eq!(store.len("storefront"), 1);
        let cart = store.load_cart(&site(), "c-1", "alice").unwrap().unwrap();
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_insert_moves_cart_to_new_owner() {
        let store = InMemoryCartStore::new();
        store.insert("storefront", Cart::new("c-1", "alice"));
        store.insert("storefront", Cart::new("c-1", "bob"));

        let bob = store.list_carts(&site(), &["bob".to_string()]).unwrap();
        assert_eq!(bob, vec![CartRef::new("c-1", "bob")]);
        assert!(store.load_cart(&site(), "c-1", "bob").unwrap().is_some());

        let alice = store.list_carts(&site(), &["alice".to_string()]).unwrap();
        assert!(alice.is_empty());
        assert_eq!(store.len("storefront"), 1);
    }

    #[test]
    fn test_dangling_ref_over_existing_cart_is_listed_once() {
        let store = InMemoryCartStore::new();
        store.insert(
            "storefront",
            Cart::new("c-1", "alice").with_line(CartLine::new("SKU-1", 3)),
        );
        store.insert_dangling_ref("storefront", CartRef::new("c-1", "alice"));

        let refs = store.list_carts(&site(), &["alice".to_string()]).unwrap();
        assert_eq!(refs, vec![CartRef::new("c-1", "alice")]);
        assert!(store.load_cart(&site(), "c-1", "alice").unwrap().is_none());
    }

    #[test]
    fn test_load_cart_checks_owner_and_dangling_refs() {
        let store = InMemoryCartStore::new();
        store.insert("storefront", Cart::new("c-1", "alice"));
        store.insert_dangling_ref("storefront", CartRef::new("c-gone", "alice"));

        assert!(store.load_cart(&site(), "c-1", "bob").unwrap().is_none());
        assert!(store.load_cart(&site(), "c-gone", "alice").unwrap().is_none());
        assert_eq!(store.list_carts(&site(), &["alice".to_string()]).unwrap().len(), 2);
    }

    #[test]
    fn test_identity_directory() {
        let directory = InMemoryIdentityDirectory::new();
        directory.register("contact-1", CustomerRecord::new("customer-42"));

        assert_eq!(
            directory.get_user("contact-1").unwrap(),
            Some(CustomerRecord::new("customer-42"))
        );
        assert_eq!(directory.get_user("contact-2").unwrap(), None);
    }
}
