use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::sqlite::{orders::ORDER_COLUMNS, SqliteDatabaseError},
    db_types::{NewOrderItem, Order, OrderItem},
};

/// Idempotent: the partial unique index on `orders (user_id) WHERE state = 'basket'` turns a second insert into a
/// no-op.
pub async fn fetch_or_create_basket(user_id: i64, conn: &mut SqliteConnection) -> Result<Order, SqliteDatabaseError> {
    let created = sqlx::query("INSERT OR IGNORE INTO orders (user_id, state) VALUES (?, 'basket')")
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if created > 0 {
        debug!("🧺️ Created a new basket for user #{user_id}");
    }
    let q = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? AND state = 'basket'");
    let basket = sqlx::query_as::<_, Order>(&q).bind(user_id).fetch_one(conn).await?;
    Ok(basket)
}

pub async fn baskets_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, SqliteDatabaseError> {
    let q = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? AND state = 'basket'");
    let baskets = sqlx::query_as::<_, Order>(&q).bind(user_id).fetch_all(conn).await?;
    Ok(baskets)
}

pub async fn insert_item(
    order_id: i64,
    item: &NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, SqliteDatabaseError> {
    let item = sqlx::query_as::<_, OrderItem>(
        "INSERT INTO order_items (order_id, product_info_id, quantity) VALUES (?, ?, ?) RETURNING id, order_id, \
         product_info_id, quantity",
    )
    .bind(order_id)
    .bind(item.product_info)
    .bind(item.quantity)
    .fetch_one(conn)
    .await?;
    trace!("🧺️ Line #{} added to basket #{order_id}", item.id);
    Ok(item)
}

pub async fn update_item_quantity(
    user_id: i64,
    item_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let updated = sqlx::query(
        "UPDATE order_items SET quantity = ? WHERE id = ? AND order_id IN (SELECT id FROM orders WHERE user_id = ? AND \
         state = 'basket')",
    )
    .bind(quantity)
    .bind(item_id)
    .bind(user_id)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(updated)
}

pub async fn delete_items(user_id: i64, ids: &[i64], conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new(
        "DELETE FROM order_items WHERE order_id IN (SELECT id FROM orders WHERE state = 'basket' AND user_id = ",
    );
    builder.push_bind(user_id);
    builder.push(") AND id IN (");
    let mut id_list = builder.separated(", ");
    for id in ids {
        id_list.push_bind(*id);
    }
    builder.push(")");
    let deleted = builder.build().execute(conn).await?.rows_affected();
    debug!("🧺️ Removed {deleted} lines from the basket of user #{user_id}");
    Ok(deleted)
}
