use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog_objects::ProductInfoDetail,
    db_types::{OrderState, Price},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub id: i64,
    /// `None` when the SKU was dropped by a later catalog import.
    pub product_info: Option<ProductInfoDetail>,
    pub quantity: i64,
}

impl OrderItemDetail {
    /// Quantity × current unit price. Lines without a SKU are worth nothing.
    pub fn line_total(&self) -> Price {
        self.product_info.as_ref().map(|p| p.price * self.quantity).unwrap_or_default()
    }
}

/// An order (or basket) with its line items and a total computed from current catalog prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub ordered_items: Vec<OrderItemDetail>,
    pub state: OrderState,
    pub dt: DateTime<Utc>,
    pub total_sum: Price,
    pub contact: Option<i64>,
}

impl OrderDetail {
    pub fn new(
        id: i64,
        state: OrderState,
        dt: DateTime<Utc>,
        contact: Option<i64>,
        ordered_items: Vec<OrderItemDetail>,
    ) -> Self {
        let total_sum = ordered_items.iter().map(OrderItemDetail::line_total).sum();
        Self { id, ordered_items, state, dt, total_sum, contact }
    }
}
