use serde::{Deserialize, Serialize};

use crate::db_types::Price;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    /// The category name
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductParameterValue {
    pub parameter: String,
    pub value: String,
}

/// An orderable SKU with its product, category and parameters resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfoDetail {
    pub id: i64,
    pub model: String,
    pub external_id: i64,
    pub product: ProductSummary,
    pub shop: i64,
    pub quantity: i64,
    pub price: Price,
    pub price_rrc: Price,
    pub product_parameters: Vec<ProductParameterValue>,
}

/// Narrows a product listing. Listings only ever include shops that are accepting orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQueryFilter {
    pub shop_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl ProductQueryFilter {
    pub fn with_shop_id(mut self, shop_id: i64) -> Self {
        self.shop_id = Some(shop_id);
        self
    }

    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// The outcome of a successful price-list import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub shop_id: i64,
    pub categories: usize,
    pub products: usize,
}
