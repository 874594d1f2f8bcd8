//! Cart store: the aggregate plus write-through persistence.
//!
//! Constructed once per session with an injected storage backend. Every
//! item mutation persists the updated list synchronously; a failed save
//! leaves the in-memory state correct and is logged, not surfaced (best
//! effort durability). Visibility-flag changes never persist.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::catalog::{Product, ProductVariant};
use crate::domain::aggregates::{Cart, CartLineItem, CartSummary};
use crate::domain::events::CartEvent;
use crate::domain::value_objects::PricingRules;
use crate::storage::{CartSnapshot, CartStorage};

pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Opens the store, restoring the persisted item list. A missing or
    /// malformed snapshot yields an empty cart rather than an error.
    pub fn open(storage: S, pricing: PricingRules) -> Self {
        let cart = match storage.load() {
            Ok(Some(snapshot)) => Cart::from_items(snapshot.items, pricing),
            Ok(None) => Cart::new(pricing),
            Err(e) => {
                warn!(error = %e, "discarding unreadable cart snapshot");
                Cart::new(pricing)
            }
        };
        Self { cart, storage }
    }

    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        selected_variant: Option<ProductVariant>,
        customizations: Option<HashMap<String, String>>,
    ) {
        self.cart
            .add_item(product, quantity, selected_variant, customizations);
        debug!(product_id = %product.id, quantity, "added item to cart");
        self.persist();
    }

    pub fn remove_item(&mut self, product_id: &str, variant_id: Option<&str>) {
        self.cart.remove_item(product_id, variant_id);
        self.persist();
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32, variant_id: Option<&str>) {
        self.cart.update_quantity(product_id, quantity, variant_id);
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    pub fn toggle_cart(&mut self) {
        self.cart.toggle_open();
    }

    pub fn open_cart(&mut self) {
        self.cart.open();
    }

    pub fn close_cart(&mut self) {
        self.cart.close();
    }

    pub fn is_open(&self) -> bool {
        self.cart.is_open()
    }

    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    pub fn cart_summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn item_count(&self, product_id: &str, variant_id: Option<&str>) -> u32 {
        self.cart.item_count(product_id, variant_id)
    }

    pub fn is_product_in_cart(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        self.cart.contains(product_id, variant_id)
    }

    /// Drains change notifications accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<CartEvent> {
        self.cart.take_events()
    }

    fn persist(&self) {
        let snapshot = CartSnapshot { items: self.cart.items().to_vec() };
        if let Err(e) = self.storage.save(&snapshot) {
            warn!(error = %e, "cart snapshot save failed; in-memory state kept");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCategory;
    use crate::domain::value_objects::Money;
    use crate::storage::{MemoryStorage, StorageError};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: id.to_string(),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            description: String::new(),
            category: ProductCategory::Bags,
            price: Money::usd(price),
            compare_at_price: None,
            in_stock: true,
            tags: vec![],
            variants: vec![],
            customization_options: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Counts saves and optionally rejects them.
    #[derive(Default)]
    struct CountingStorage {
        saves: AtomicUsize,
        fail: bool,
    }

    impl CartStorage for CountingStorage {
        fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
            Ok(None)
        }

        fn save(&self, _snapshot: &CartSnapshot) -> Result<(), StorageError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StorageError::Unavailable("quota exceeded".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_round_trip_persistence() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage, PricingRules::default());
        store.add_item(&product("P1", Decimal::new(100, 0)), 2, None, None);
        store.add_item(&product("P2", Decimal::new(25, 0)), 1, None, None);
        let summary_before = store.cart_summary();
        let total_before = store.total_items();

        let reopened = CartStore::open(&storage, PricingRules::default());
        assert_eq!(reopened.total_items(), total_before);
        assert_eq!(reopened.cart_summary(), summary_before);
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let storage = MemoryStorage::with_raw("{\"items\": \"oops\"}");
        let store = CartStore::open(&storage, PricingRules::default());
        assert_eq!(store.total_items(), 0);
        assert!(store.items().is_empty());
    }

    fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_save_failure_keeps_in_memory_state() {
        init_test_logging();
        let storage = CountingStorage { fail: true, ..Default::default() };
        let mut store = CartStore::open(storage, PricingRules::default());
        store.add_item(&product("P1", Decimal::new(50, 0)), 3, None, None);
        assert_eq!(store.total_items(), 3);
        assert!(store.is_product_in_cart("P1", None));
    }

    #[test]
    fn test_visibility_changes_do_not_persist() {
        let storage = CountingStorage::default();
        let mut store = CartStore::open(storage, PricingRules::default());
        store.toggle_cart();
        store.open_cart();
        store.close_cart();
        assert_eq!(store.storage.saves.load(Ordering::SeqCst), 0);
        store.add_item(&product("P1", Decimal::new(10, 0)), 1, None, None);
        assert_eq!(store.storage.saves.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mutations_write_through() {
        let storage = CountingStorage::default();
        let mut store = CartStore::open(storage, PricingRules::default());
        store.add_item(&product("P1", Decimal::new(10, 0)), 1, None, None);
        store.update_quantity("P1", 4, None);
        store.remove_item("P1", None);
        store.clear_cart();
        assert_eq!(store.storage.saves.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_visibility_flag_resets_on_reopen() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(&storage, PricingRules::default());
        store.add_item(&product("P1", Decimal::new(10, 0)), 1, None, None);
        store.open_cart();
        assert!(store.is_open());

        let reopened = CartStore::open(&storage, PricingRules::default());
        assert!(!reopened.is_open());
        assert_eq!(reopened.total_items(), 1);
    }

    #[test]
    fn test_store_events_forwarded() {
        let mut store = CartStore::open(MemoryStorage::new(), PricingRules::default());
        store.add_item(&product("P1", Decimal::new(10, 0)), 2, None, None);
        let events = store.take_events();
        assert_eq!(
            events,
            vec![CartEvent::ItemAdded { product_id: "P1".into(), variant_id: None, quantity: 2 }]
        );
    }
}
