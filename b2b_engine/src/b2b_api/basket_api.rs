use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrderItem, OrderItemUpdate, MAX_ITEM_QUANTITY},
    order_objects::OrderDetail,
    traits::BasketManagement,
    BasketApiError,
};

/// `BasketApi` manages the buyer's basket: the single order per user that is still in the `basket` state.
///
/// Batch operations are lenient. Entries that fail validation are skipped and the caller is told how many entries
/// took effect, not which ones failed.
pub struct BasketApi<B> {
    db: B,
}

impl<B: Debug> Debug for BasketApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BasketApi ({:?})", self.db)
    }
}

impl<B> BasketApi<B>
where B: BasketManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The user's basket with line items and a total at current prices.
    pub async fn basket(&self, user_id: i64) -> Result<Vec<OrderDetail>, BasketApiError> {
        self.db.fetch_basket(user_id).await
    }

    /// Adds lines to the basket, creating the basket on first use, and returns how many were added.
    ///
    /// Lines with a quantity outside `1..=MAX_ITEM_QUANTITY` or an unknown SKU are skipped. A database integrity
    /// failure (for example, a SKU that is already in the basket) aborts the batch; lines added before it stay added.
    pub async fn add_items(&self, user_id: i64, items: &[NewOrderItem]) -> Result<u64, BasketApiError> {
        let mut created = 0;
        for item in items {
            if !valid_quantity(item.quantity) {
                let (sku, quantity) = (item.product_info, item.quantity);
                debug!("🧺️ Skipping basket line for SKU #{sku}: quantity {quantity} is out of range");
                continue;
            }
            if !self.db.product_info_exists(item.product_info).await? {
                debug!("🧺️ Skipping basket line: SKU #{} does not exist", item.product_info);
                continue;
            }
            self.db.add_basket_item(user_id, item).await?;
            created += 1;
        }
        debug!("🧺️ Added {created} of {} lines to the basket of user #{user_id}", items.len());
        Ok(created)
    }

    /// Changes line quantities and returns how many lines changed. Out-of-range quantities, and lines that are not
    /// in the user's basket, are skipped.
    pub async fn update_items(&self, user_id: i64, updates: &[OrderItemUpdate]) -> Result<u64, BasketApiError> {
        let mut updated = 0;
        for update in updates {
            if !valid_quantity(update.quantity) {
                debug!("🧺️ Skipping update of line #{}: quantity {} is out of range", update.id, update.quantity);
                continue;
            }
            updated += self.db.update_basket_item(user_id, update.id, update.quantity).await?;
        }
        Ok(updated)
    }

    pub async fn delete_items(&self, user_id: i64, ids: &[i64]) -> Result<u64, BasketApiError> {
        self.db.delete_basket_items(user_id, ids).await
    }
}

fn valid_quantity(quantity: i64) -> bool {
    (1..=MAX_ITEM_QUANTITY).contains(&quantity)
}
