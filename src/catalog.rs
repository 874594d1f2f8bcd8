//! Catalog reference data.
//!
//! Products, variants, and customization options are owned by the catalog
//! collaborator and arrive at the cart already validated. The cart snapshots
//! them into line items; it never fetches, caches, or checks their shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub in_stock: bool,
    pub tags: Vec<String>,
    pub variants: Vec<ProductVariant>,
    pub customization_options: Vec<CustomizationOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Looks up a customization option by id. Unknown ids are simply absent,
    /// never an error.
    pub fn customization_option(&self, option_id: &str) -> Option<&CustomizationOption> {
        self.customization_options.iter().find(|o| o.id == option_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    Wallets,
    Shoes,
    Bags,
    Coats,
    Belts,
    LeatherHides,
    LuxuryCarpets,
    Janamaz,
    #[default]
    Accessories,
    Customization,
}

/// A purchasable variant of a product. Its price overrides the product base
/// price when selected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    pub sku: Option<String>,
    pub name: String,
    pub price: Money,
    pub in_stock: bool,
    pub stock_quantity: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub id: String,
    pub name: String,
    pub kind: CustomizationKind,
    pub required: bool,
    pub choices: Vec<String>,
    pub additional_price: Option<Money>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationKind {
    #[default]
    Text,
    Select,
    Color,
    Size,
}
