use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::{catalog, users::USER_COLUMNS, SqliteDatabaseError},
    db_types::{Order, OrderItem, OrderState, User},
    order_objects::{OrderDetail, OrderItemDetail},
};

pub(crate) const ORDER_COLUMNS: &str = "orders.id, orders.user_id, orders.dt, orders.state, orders.contact_id";

pub async fn order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let q = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&q).bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn order_owner(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let q = format!("SELECT {USER_COLUMNS} FROM orders JOIN users ON users.id = orders.user_id WHERE orders.id = ?");
    let user = sqlx::query_as::<_, User>(&q).bind(order_id).fetch_optional(conn).await?;
    Ok(user)
}

/// Sets the contact and moves the order to `new`, provided it is `user_id`'s basket. Returns the number of rows
/// changed. The caller is responsible for checking that the contact belongs to the user.
pub async fn place_order(
    user_id: i64,
    order_id: i64,
    contact_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let updated = sqlx::query(
        "UPDATE orders SET contact_id = ?, state = 'new', dt = CURRENT_TIMESTAMP WHERE id = ? AND user_id = ? AND \
         state = 'basket'",
    )
    .bind(contact_id)
    .bind(order_id)
    .bind(user_id)
    .execute(conn)
    .await?
    .rows_affected();
    trace!("🗃️ Placing order #{order_id} for user #{user_id} changed {updated} rows");
    Ok(updated)
}

/// Placed orders of the user, newest first.
pub async fn orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, SqliteDatabaseError> {
    let q = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? AND state <> 'basket' ORDER BY dt DESC, id DESC");
    let orders = sqlx::query_as::<_, Order>(&q).bind(user_id).fetch_all(conn).await?;
    Ok(orders)
}

/// Placed orders that contain at least one SKU from the supplier's shop, newest first.
pub async fn orders_for_supplier(
    supplier_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, SqliteDatabaseError> {
    let q = format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE state <> 'basket' AND EXISTS (SELECT 1 FROM order_items oi JOIN \
         product_infos pi ON pi.id = oi.product_info_id JOIN shops s ON s.id = pi.shop_id WHERE oi.order_id = \
         orders.id AND s.user_id = ?) ORDER BY dt DESC, id DESC"
    );
    let orders = sqlx::query_as::<_, Order>(&q).bind(supplier_id).fetch_all(conn).await?;
    Ok(orders)
}

pub async fn update_state_for_supplier(
    supplier_id: i64,
    order_id: i64,
    state: OrderState,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET state = ? WHERE id = ? AND state <> 'basket' AND EXISTS (SELECT 1 FROM order_items oi JOIN \
         product_infos pi ON pi.id = oi.product_info_id JOIN shops s ON s.id = pi.shop_id WHERE oi.order_id = \
         orders.id AND s.user_id = ?) RETURNING id, user_id, dt, state, contact_id",
    )
    .bind(state)
    .bind(order_id)
    .bind(supplier_id)
    .fetch_optional(conn)
    .await?;
    if let Some(order) = &order {
        debug!("🗃️ Order #{} moved to '{}' by supplier #{supplier_id}", order.id, order.state);
    }
    Ok(order)
}

pub async fn items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, SqliteDatabaseError> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_info_id, quantity FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Resolves each order's lines against the current catalog and totals them at today's prices.
pub async fn order_details(
    orders: Vec<Order>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetail>, SqliteDatabaseError> {
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = items_for_order(order.id, conn).await?;
        let mut details = Vec::with_capacity(items.len());
        for item in items {
            let product_info = match item.product_info_id {
                Some(id) => catalog::product_info_by_id(id, conn).await?,
                None => None,
            };
            details.push(OrderItemDetail { id: item.id, product_info, quantity: item.quantity });
        }
        result.push(OrderDetail::new(order.id, order.state, order.dt, order.contact_id, details));
    }
    Ok(result)
}
