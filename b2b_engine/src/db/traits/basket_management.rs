use crate::{
    db_types::{NewOrderItem, Order, OrderItem},
    order_objects::OrderDetail,
    BasketApiError,
};

/// The `BasketManagement` trait defines behaviour for the buyer's basket. A basket is simply an order in the `basket`
/// state; each user has at most one.
#[allow(async_fn_in_trait)]
pub trait BasketManagement {
    /// Returns the user's basket, creating an empty one if necessary. Calling this repeatedly never creates more
    /// than one basket.
    async fn fetch_or_create_basket(&self, user_id: i64) -> Result<Order, BasketApiError>;

    /// The user's basket(s) with items and live totals. Empty if the user has never used their basket.
    async fn fetch_basket(&self, user_id: i64) -> Result<Vec<OrderDetail>, BasketApiError>;

    async fn product_info_exists(&self, product_info_id: i64) -> Result<bool, BasketApiError>;

    /// Adds a line to the user's basket. Adding a SKU that is already in the basket is an integrity error.
    async fn add_basket_item(&self, user_id: i64, item: &NewOrderItem) -> Result<OrderItem, BasketApiError>;

    /// Changes the quantity of a line in the user's basket. Returns the number of rows changed (0 or 1).
    async fn update_basket_item(&self, user_id: i64, item_id: i64, quantity: i64) -> Result<u64, BasketApiError>;

    /// Removes those of the given lines that are in the user's basket, returning how many were removed.
    async fn delete_basket_items(&self, user_id: i64, ids: &[i64]) -> Result<u64, BasketApiError>;
}
