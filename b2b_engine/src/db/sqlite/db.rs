use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{auth, baskets, catalog, contacts, new_pool, orders, users, SqliteDatabaseError};
use crate::{
    catalog_objects::{ImportSummary, ProductInfoDetail, ProductQueryFilter},
    db::traits::{AccountManagement, AuthManagement, BasketManagement, CatalogManagement, OrderManagement},
    db_types::{
        Category,
        Contact,
        ContactUpdate,
        NewContact,
        NewOrderItem,
        NewUser,
        Order,
        OrderItem,
        OrderState,
        ProductInfo,
        Shop,
        User,
        UserCredentials,
        UserUpdate,
    },
    feed::PriceFeed,
    order_objects::OrderDetail,
    AccountApiError,
    AuthApiError,
    BasketApiError,
    CatalogApiError,
    OrderFlowApiError,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
        confirm_token: &str,
    ) -> Result<User, AccountApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let user = users::insert_user(user, password_hash, confirm_token, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(user)
    }

    async fn confirm_email(&self, email: &str, token: &str) -> Result<bool, AccountApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let confirmed = users::confirm_email(email, token, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(confirmed)
    }

    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(users::user_by_id(user_id, &mut conn).await?)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(users::user_by_email(email, &mut conn).await?)
    }

    async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        trace!("🗃️ User #{user_id} updating");
        users::update_user(user_id, update, &mut conn).await?.ok_or(AccountApiError::UserNotFound)
    }

    async fn fetch_contacts(&self, user_id: i64) -> Result<Vec<Contact>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(contacts::contacts_for_user(user_id, &mut conn).await?)
    }

    async fn create_contact(&self, user_id: i64, contact: &NewContact) -> Result<Contact, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(contacts::insert_contact(user_id, contact, &mut conn).await?)
    }

    async fn update_contact(
        &self,
        user_id: i64,
        contact_id: i64,
        update: ContactUpdate,
    ) -> Result<Option<Contact>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(contacts::update_contact(user_id, contact_id, update, &mut conn).await?)
    }

    async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(contacts::delete_contacts(user_id, ids, &mut conn).await?)
    }

    async fn create_password_reset_token(&self, user_id: i64, token: &str) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(users::insert_password_reset_token(user_id, token, &mut conn).await?)
    }

    async fn reset_password(&self, token: &str, password_hash: &str) -> Result<Option<User>, AccountApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let user = users::reset_password(token, password_hash, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(user)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn fetch_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(auth::credentials_for_email(email, &mut conn).await?)
    }

    async fn fetch_or_create_token(&self, user_id: i64, candidate: &str) -> Result<String, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(auth::fetch_or_create_token(user_id, candidate, &mut conn).await?)
    }

    async fn fetch_user_for_token(&self, token: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(auth::user_for_token(token, &mut conn).await?)
    }
}

impl CatalogManagement for SqliteDatabase {
    /// Runs the whole import in one transaction. Any error rolls back to the previous catalog.
    async fn import_price_list(
        &self,
        user_id: i64,
        source_url: Option<String>,
        feed: &PriceFeed,
    ) -> Result<ImportSummary, CatalogApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let summary = catalog::import_price_list(user_id, source_url.as_deref(), feed, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        debug!("🗃️ Price list for shop #{} committed", summary.shop_id);
        Ok(summary)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::categories(&mut conn).await?)
    }

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::category_by_id(id, &mut conn).await?)
    }

    async fn fetch_shops(&self) -> Result<Vec<Shop>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::shops(&mut conn).await?)
    }

    async fn fetch_shop(&self, id: i64) -> Result<Option<Shop>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::shop_by_id(id, &mut conn).await?)
    }

    async fn fetch_shop_for_user(&self, user_id: i64) -> Result<Option<Shop>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::shop_for_user(user_id, &mut conn).await?)
    }

    async fn set_shop_state(&self, user_id: i64, state: bool) -> Result<Option<Shop>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::set_shop_state(user_id, state, &mut conn).await?)
    }

    async fn fetch_product_infos(
        &self,
        filter: ProductQueryFilter,
    ) -> Result<Vec<ProductInfoDetail>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::product_infos(filter, &mut conn).await?)
    }

    async fn fetch_product_info(&self, id: i64) -> Result<Option<ProductInfoDetail>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::product_info_by_id(id, &mut conn).await?)
    }
}

impl BasketManagement for SqliteDatabase {
    async fn fetch_or_create_basket(&self, user_id: i64) -> Result<Order, BasketApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(baskets::fetch_or_create_basket(user_id, &mut conn).await?)
    }

    async fn fetch_basket(&self, user_id: i64) -> Result<Vec<OrderDetail>, BasketApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let baskets = baskets::baskets_for_user(user_id, &mut tx).await?;
        let details = orders::order_details(baskets, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(details)
    }

    async fn product_info_exists(&self, product_info_id: i64) -> Result<bool, BasketApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(catalog::product_info_exists(product_info_id, &mut conn).await?)
    }

    async fn add_basket_item(&self, user_id: i64, item: &NewOrderItem) -> Result<OrderItem, BasketApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let basket = baskets::fetch_or_create_basket(user_id, &mut tx).await?;
        let item = baskets::insert_item(basket.id, item, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(item)
    }

    async fn update_basket_item(&self, user_id: i64, item_id: i64, quantity: i64) -> Result<u64, BasketApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(baskets::update_item_quantity(user_id, item_id, quantity, &mut conn).await?)
    }

    async fn delete_basket_items(&self, user_id: i64, ids: &[i64]) -> Result<u64, BasketApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(baskets::delete_items(user_id, ids, &mut conn).await?)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn place_order(&self, user_id: i64, order_id: i64, contact_id: i64) -> Result<bool, OrderFlowApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        if contacts::contact_for_user(user_id, contact_id, &mut tx).await?.is_none() {
            debug!("🗃️ User #{user_id} tried to place order #{order_id} with contact #{contact_id}, which is not theirs");
            return Err(OrderFlowApiError::InvalidContact);
        }
        let updated = orders::place_order(user_id, order_id, contact_id, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(updated > 0)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderDetail>, OrderFlowApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let order = orders::order_by_id(order_id, &mut tx).await?;
        let detail = match order {
            Some(order) => orders::order_details(vec![order], &mut tx).await?.pop(),
            None => None,
        };
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(detail)
    }

    async fn fetch_order_owner(&self, order_id: i64) -> Result<Option<User>, OrderFlowApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(orders::order_owner(order_id, &mut conn).await?)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let placed = orders::orders_for_user(user_id, &mut tx).await?;
        let details = orders::order_details(placed, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(details)
    }

    async fn fetch_orders_for_supplier(&self, supplier_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let placed = orders::orders_for_supplier(supplier_id, &mut tx).await?;
        let details = orders::order_details(placed, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(details)
    }

    async fn update_order_state_for_supplier(
        &self,
        supplier_id: i64,
        order_id: i64,
        state: OrderState,
    ) -> Result<Option<Order>, OrderFlowApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(orders::update_state_for_supplier(supplier_id, order_id, state, &mut conn).await?)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Applies the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// The raw SKU rows currently listed by a shop.
    pub async fn product_infos_for_shop(&self, shop_id: i64) -> Result<Vec<ProductInfo>, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        catalog::product_infos_for_shop(shop_id, &mut conn).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
