use crate::{
    db_types::{Order, OrderState, User},
    order_objects::OrderDetail,
    OrderFlowApiError,
};

/// The `OrderManagement` trait defines behaviour for placed orders: checkout, order history and fulfilment.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Turns a basket into a placed order in a single conditioned update: the contact is set and the state moves
    /// to `new`, but only if the order belongs to `user_id` and is still a basket.
    ///
    /// Returns `false` if no such basket exists. If the contact does not belong to the user, the error
    /// [`OrderFlowApiError::InvalidContact`] is returned and nothing changes.
    async fn place_order(&self, user_id: i64, order_id: i64, contact_id: i64) -> Result<bool, OrderFlowApiError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderDetail>, OrderFlowApiError>;

    /// The buyer that owns the order.
    async fn fetch_order_owner(&self, order_id: i64) -> Result<Option<User>, OrderFlowApiError>;

    /// The user's placed orders (everything except the basket), newest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError>;

    /// Placed orders containing at least one SKU from the supplier's shop, newest first.
    async fn fetch_orders_for_supplier(&self, supplier_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError>;

    /// Moves a placed order that contains the supplier's goods into `state`. Returns the updated order, or `None` if
    /// the supplier has no such order.
    async fn update_order_state_for_supplier(
        &self,
        supplier_id: i64,
        order_id: i64,
        state: OrderState,
    ) -> Result<Option<Order>, OrderFlowApiError>;
}
