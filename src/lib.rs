//! Storefront Cart
//!
//! Shopping cart core for a leather-goods storefront.
//!
//! ## Features
//! - Line-item list keyed on `(product_id, variant_id)` with quantity merging
//! - Derived totals: subtotal, tax, flat/free shipping, total
//! - Per-line customization pricing (engraving and the like)
//! - Write-through persistence to an injected storage backend
//! - Change notification via drainable domain events
//!
//! The cart exposes no network or CLI surface; UI code calls the operations
//! on [`store::CartStore`] and reads its selectors.

pub mod catalog;
pub mod domain;
pub mod storage;
pub mod store;

pub use catalog::{CustomizationKind, CustomizationOption, Product, ProductCategory, ProductVariant};
pub use domain::aggregates::{Cart, CartLineItem, CartSummary};
pub use domain::events::CartEvent;
pub use domain::value_objects::{Money, MoneyError, PricingRules};
pub use storage::{CartSnapshot, CartStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use store::CartStore;

pub type Result<T> = std::result::Result<T, StorageError>;
