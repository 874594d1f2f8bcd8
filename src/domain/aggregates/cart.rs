//! Cart Aggregate
//!
//! Owns the authoritative line-item list and the ephemeral open/closed flag.
//! Line items are identified by the compound key `(product_id, variant_id)`:
//! adding an existing combination merges into the existing row instead of
//! creating a duplicate. All operations are total; a miss is a no-op, never
//! an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::{Product, ProductVariant};
use crate::domain::events::CartEvent;
use crate::domain::value_objects::{Money, PricingRules};

#[derive(Clone, Debug, Default)]
pub struct Cart {
    items: Vec<CartLineItem>,
    is_open: bool,
    pricing: PricingRules,
    events: Vec<CartEvent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: String,
    /// Snapshot of the product as it was when added; not live-synced with
    /// later catalog changes.
    pub product: Product,
    pub quantity: u32,
    pub selected_variant: Option<ProductVariant>,
    pub customizations: Option<HashMap<String, String>>,
    /// Set on first insertion, untouched by quantity changes.
    pub added_at: DateTime<Utc>,
}

impl CartLineItem {
    fn matches(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        self.product_id == product_id && self.variant_id() == variant_id
    }

    fn variant_id(&self) -> Option<&str> {
        self.selected_variant.as_ref().map(|v| v.id.as_str())
    }

    /// Variant price when a variant is selected, else the product base price,
    /// plus the additional price of every customization key that resolves to
    /// a product option. Unmatched keys contribute zero.
    pub fn effective_unit_price(&self) -> Money {
        let base = self
            .selected_variant
            .as_ref()
            .map(|v| v.price.clone())
            .unwrap_or_else(|| self.product.price.clone());
        let Some(customizations) = &self.customizations else {
            return base;
        };
        customizations.keys().fold(base, |acc, key| {
            match self
                .product
                .customization_option(key)
                .and_then(|opt| opt.additional_price.as_ref())
            {
                Some(extra) => acc.add(extra).unwrap_or(acc),
                None => acc,
            }
        })
    }

    pub fn line_total(&self) -> Money {
        self.effective_unit_price().multiply(self.quantity)
    }
}

/// Derived totals, recomputed on demand. `discount` is always zero; there is
/// no coupon engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub discount: Money,
    pub total: Money,
}

impl Cart {
    pub fn new(pricing: PricingRules) -> Self {
        Self { items: vec![], is_open: false, pricing, events: vec![] }
    }

    /// Rebuilds a cart from a persisted item list.
    pub fn from_items(items: Vec<CartLineItem>, pricing: PricingRules) -> Self {
        Self { items, is_open: false, pricing, events: vec![] }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pricing(&self) -> &PricingRules {
        &self.pricing
    }

    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        selected_variant: Option<ProductVariant>,
        customizations: Option<HashMap<String, String>>,
    ) {
        let variant_id = selected_variant.as_ref().map(|v| v.id.clone());
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(&product.id, variant_id.as_deref()))
        {
            // Merge keeps the existing row's customizations; the incoming
            // payload is dropped.
            existing.quantity += quantity;
        } else {
            self.items.push(CartLineItem {
                product_id: product.id.clone(),
                product: product.clone(),
                quantity,
                selected_variant,
                customizations,
                added_at: Utc::now(),
            });
        }
        self.raise(CartEvent::ItemAdded {
            product_id: product.id.clone(),
            variant_id,
            quantity,
        });
    }

    /// Idempotent: removing an absent key is a no-op.
    pub fn remove_item(&mut self, product_id: &str, variant_id: Option<&str>) {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, variant_id));
        if self.items.len() != before {
            self.raise(CartEvent::ItemRemoved {
                product_id: product_id.to_string(),
                variant_id: variant_id.map(String::from),
            });
        }
    }

    /// Absolute set, not a delta. Zero removes the row; a missing row is a
    /// no-op.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32, variant_id: Option<&str>) {
        if quantity == 0 {
            self.remove_item(product_id, variant_id);
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.matches(product_id, variant_id))
        {
            item.quantity = quantity;
            self.raise(CartEvent::QuantityChanged {
                product_id: product_id.to_string(),
                variant_id: variant_id.map(String::from),
                quantity,
            });
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.raise(CartEvent::Cleared);
    }

    pub fn toggle_open(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.raise(CartEvent::Opened);
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.raise(CartEvent::Closed);
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn item_count(&self, product_id: &str, variant_id: Option<&str>) -> u32 {
        self.items
            .iter()
            .find(|i| i.matches(product_id, variant_id))
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn contains(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        self.items.iter().any(|i| i.matches(product_id, variant_id))
    }

    /// Derived totals. Rounded half away from zero at each step, in
    /// subtotal, tax, total order; shipping compares against the rounded
    /// subtotal.
    pub fn summary(&self) -> CartSummary {
        let currency = self.pricing.currency.as_str();
        let subtotal = self
            .items
            .iter()
            .fold(Money::zero(currency), |acc, i| {
                acc.add(&i.line_total()).unwrap_or(acc)
            })
            .round_cents();
        let shipping = if subtotal.amount() >= self.pricing.free_shipping_threshold {
            Money::zero(currency)
        } else {
            Money::new(self.pricing.standard_shipping, currency)
        };
        let tax = subtotal.scale(self.pricing.tax_rate).round_cents();
        let total = subtotal
            .add(&shipping)
            .and_then(|m| m.add(&tax))
            .unwrap_or_else(|_| subtotal.clone())
            .round_cents();
        CartSummary {
            subtotal,
            tax,
            shipping,
            discount: Money::zero(currency),
            total,
        }
    }

    pub fn take_events(&mut self) -> Vec<CartEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise(&mut self, event: CartEvent) {
        self.events.push(event);
    }
}
