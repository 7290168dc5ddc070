use std::collections::HashMap;

use log::{debug, trace};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    catalog_objects::{ImportSummary, ProductInfoDetail, ProductParameterValue, ProductQueryFilter, ProductSummary},
    db::sqlite::SqliteDatabaseError,
    db_types::{Category, Price, ProductInfo, Shop},
    feed::{FeedGood, PriceFeed},
};

const SHOP_COLUMNS: &str = "id, name, url, user_id, state";

//--------------------------------------        Import         ---------------------------------------------------------

/// Replaces the supplier's catalog with the feed's contents. This is not atomic on its own. Run it inside a
/// transaction and pass `&mut *tx` as the connection, so that a failure part-way leaves the old catalog in place.
pub async fn import_price_list(
    user_id: i64,
    source_url: Option<&str>,
    feed: &PriceFeed,
    conn: &mut SqliteConnection,
) -> Result<ImportSummary, SqliteDatabaseError> {
    let shop_id = upsert_shop_for_user(user_id, &feed.shop, source_url, conn).await?;
    for category in &feed.categories {
        // Categories are shared between shops. The first feed to mention one names it.
        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?) ON CONFLICT (id) DO NOTHING")
            .bind(category.id)
            .bind(&category.name)
            .execute(&mut *conn)
            .await?;
        sqlx::query("INSERT OR IGNORE INTO shop_categories (shop_id, category_id) VALUES (?, ?)")
            .bind(shop_id)
            .bind(category.id)
            .execute(&mut *conn)
            .await?;
    }
    let removed = sqlx::query("DELETE FROM product_infos WHERE shop_id = ?")
        .bind(shop_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    debug!("📦️ Removed {removed} SKUs from shop #{shop_id} ahead of the import");
    for good in &feed.goods {
        insert_good(shop_id, good, conn).await?;
    }
    let summary = ImportSummary { shop_id, categories: feed.categories.len(), products: feed.goods.len() };
    debug!("📦️ Imported {} categories and {} SKUs into shop #{shop_id}", summary.categories, summary.products);
    Ok(summary)
}

/// Creates the supplier's shop, or renames it if the feed carries a different shop name.
async fn upsert_shop_for_user(
    user_id: i64,
    name: &str,
    source_url: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<i64, SqliteDatabaseError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO shops (name, url, user_id) VALUES (?, ?, ?) ON CONFLICT (user_id) DO UPDATE SET name = \
         excluded.name, url = COALESCE(excluded.url, shops.url) RETURNING id",
    )
    .bind(name)
    .bind(source_url)
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    trace!("📦️ Shop '{name}' is #{id} for user #{user_id}");
    Ok(id)
}

async fn insert_good(shop_id: i64, good: &FeedGood, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    // The no-op update makes RETURNING yield the id of an existing row too
    let product_id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, category_id) VALUES (?, ?) ON CONFLICT (name, category_id) DO UPDATE SET name = \
         excluded.name RETURNING id",
    )
    .bind(&good.name)
    .bind(good.category)
    .fetch_one(&mut *conn)
    .await?;
    let product_info_id: i64 = sqlx::query_scalar(
        "INSERT INTO product_infos (product_id, shop_id, external_id, model, quantity, price, price_rrc) VALUES (?, ?, \
         ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(product_id)
    .bind(shop_id)
    .bind(good.id)
    .bind(&good.model)
    .bind(good.quantity)
    .bind(good.price)
    .bind(good.price_rrc)
    .fetch_one(&mut *conn)
    .await?;
    for (name, value) in &good.parameters {
        let parameter_id: i64 = sqlx::query_scalar(
            "INSERT INTO parameters (name) VALUES (?) ON CONFLICT (name) DO UPDATE SET name = excluded.name RETURNING id",
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        sqlx::query("INSERT INTO product_parameters (product_info_id, parameter_id, value) VALUES (?, ?, ?)")
            .bind(product_info_id)
            .bind(parameter_id)
            .bind(value.to_string())
            .execute(&mut *conn)
            .await?;
    }
    trace!("📦️ SKU #{product_info_id} ({}) created", good.name);
    Ok(product_info_id)
}

//--------------------------------------       Browsing        ---------------------------------------------------------

pub async fn categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, SqliteDatabaseError> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name").fetch_all(conn).await?;
    Ok(categories)
}

pub async fn category_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, SqliteDatabaseError> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(category)
}

pub async fn shops(conn: &mut SqliteConnection) -> Result<Vec<Shop>, SqliteDatabaseError> {
    let q = format!("SELECT {SHOP_COLUMNS} FROM shops ORDER BY name");
    let shops = sqlx::query_as::<_, Shop>(&q).fetch_all(conn).await?;
    Ok(shops)
}

pub async fn shop_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Shop>, SqliteDatabaseError> {
    let q = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?");
    let shop = sqlx::query_as::<_, Shop>(&q).bind(id).fetch_optional(conn).await?;
    Ok(shop)
}

pub async fn shop_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Shop>, SqliteDatabaseError> {
    let q = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE user_id = ?");
    let shop = sqlx::query_as::<_, Shop>(&q).bind(user_id).fetch_optional(conn).await?;
    Ok(shop)
}

pub async fn set_shop_state(
    user_id: i64,
    state: bool,
    conn: &mut SqliteConnection,
) -> Result<Option<Shop>, SqliteDatabaseError> {
    let q = format!("UPDATE shops SET state = ? WHERE user_id = ? RETURNING {SHOP_COLUMNS}");
    let shop = sqlx::query_as::<_, Shop>(&q).bind(state).bind(user_id).fetch_optional(conn).await?;
    if let Some(shop) = &shop {
        debug!("📦️ Shop #{} is now {}", shop.id, if state { "open" } else { "closed" });
    }
    Ok(shop)
}

/// The raw SKU rows for one shop, in insertion order.
pub async fn product_infos_for_shop(
    shop_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductInfo>, SqliteDatabaseError> {
    let infos = sqlx::query_as::<_, ProductInfo>(
        "SELECT id, product_id, shop_id, external_id, model, quantity, price, price_rrc FROM product_infos WHERE \
         shop_id = ? ORDER BY id",
    )
    .bind(shop_id)
    .fetch_all(conn)
    .await?;
    Ok(infos)
}

#[derive(Debug, FromRow)]
struct ProductInfoRow {
    id: i64,
    model: String,
    external_id: i64,
    shop_id: i64,
    quantity: i64,
    price: Price,
    price_rrc: Price,
    product_name: String,
    category_name: String,
}

#[derive(Debug, FromRow)]
struct ParameterRow {
    product_info_id: i64,
    parameter: String,
    value: String,
}

fn product_info_query() -> QueryBuilder<'static, Sqlite> {
    QueryBuilder::new(
        "SELECT pi.id, pi.model, pi.external_id, pi.shop_id, pi.quantity, pi.price, pi.price_rrc, p.name AS \
         product_name, c.name AS category_name FROM product_infos pi JOIN products p ON p.id = pi.product_id JOIN \
         categories c ON c.id = p.category_id JOIN shops s ON s.id = pi.shop_id ",
    )
}

/// SKUs of shops that are accepting orders, narrowed by the filter.
pub async fn product_infos(
    filter: ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductInfoDetail>, SqliteDatabaseError> {
    let mut builder = product_info_query();
    builder.push("WHERE s.state = 1");
    if let Some(shop_id) = filter.shop_id {
        builder.push(" AND pi.shop_id = ");
        builder.push_bind(shop_id);
    }
    if let Some(category_id) = filter.category_id {
        builder.push(" AND p.category_id = ");
        builder.push_bind(category_id);
    }
    builder.push(" ORDER BY pi.id");
    trace!("🗃️ Executing query: {}", builder.sql());
    let rows = builder.build_query_as::<ProductInfoRow>().fetch_all(&mut *conn).await?;
    with_parameters(rows, conn).await
}

/// A single SKU, whether or not its shop is currently open.
pub async fn product_info_by_id(
    id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<ProductInfoDetail>, SqliteDatabaseError> {
    let mut builder = product_info_query();
    builder.push("WHERE pi.id = ");
    builder.push_bind(id);
    let row = builder.build_query_as::<ProductInfoRow>().fetch_optional(&mut *conn).await?;
    match row {
        Some(row) => Ok(with_parameters(vec![row], conn).await?.pop()),
        None => Ok(None),
    }
}

pub async fn product_info_exists(id: i64, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM product_infos WHERE id = ?)").bind(id).fetch_one(conn).await?;
    Ok(exists)
}

async fn with_parameters(
    rows: Vec<ProductInfoRow>,
    conn: &mut SqliteConnection,
) -> Result<Vec<ProductInfoDetail>, SqliteDatabaseError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new(
        "SELECT pp.product_info_id, pa.name AS parameter, pp.value FROM product_parameters pp JOIN parameters pa ON \
         pa.id = pp.parameter_id WHERE pp.product_info_id IN (",
    );
    let mut ids = builder.separated(", ");
    for row in &rows {
        ids.push_bind(row.id);
    }
    builder.push(") ORDER BY pa.name");
    let params = builder.build_query_as::<ParameterRow>().fetch_all(conn).await?;
    let mut by_sku = params.into_iter().fold(HashMap::<i64, Vec<ProductParameterValue>>::new(), |mut acc, p| {
        acc.entry(p.product_info_id).or_default().push(ProductParameterValue { parameter: p.parameter, value: p.value });
        acc
    });
    let details = rows
        .into_iter()
        .map(|row| ProductInfoDetail {
            id: row.id,
            model: row.model,
            external_id: row.external_id,
            product: ProductSummary { name: row.product_name, category: row.category_name },
            shop: row.shop_id,
            quantity: row.quantity,
            price: row.price,
            price_rrc: row.price_rrc,
            product_parameters: by_sku.remove(&row.id).unwrap_or_default(),
        })
        .collect();
    Ok(details)
}
