use crate::{
    catalog_objects::{ImportSummary, ProductInfoDetail, ProductQueryFilter},
    db_types::{Category, Shop},
    feed::PriceFeed,
    CatalogApiError,
};

/// The `CatalogManagement` trait defines behaviour for maintaining and browsing the product catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Replaces the supplier's catalog with the contents of `feed`, atomically.
    ///
    /// Inside a single transaction, the backend must
    /// * create the supplier's shop, or rename it to `feed.shop`,
    /// * upsert every category by id and link it to the shop,
    /// * delete every existing SKU of the shop,
    /// * recreate products, SKUs and their parameters from the feed.
    ///
    /// If any step fails, nothing changes.
    async fn import_price_list(
        &self,
        user_id: i64,
        source_url: Option<String>,
        feed: &PriceFeed,
    ) -> Result<ImportSummary, CatalogApiError>;

    /// All categories, ordered by name.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;

    /// All shops, ordered by name.
    async fn fetch_shops(&self) -> Result<Vec<Shop>, CatalogApiError>;

    async fn fetch_shop(&self, id: i64) -> Result<Option<Shop>, CatalogApiError>;

    async fn fetch_shop_for_user(&self, user_id: i64) -> Result<Option<Shop>, CatalogApiError>;

    /// Switches the supplier's shop on or off. Returns `None` if the user has no shop.
    async fn set_shop_state(&self, user_id: i64, state: bool) -> Result<Option<Shop>, CatalogApiError>;

    /// SKUs of active shops that match the filter.
    async fn fetch_product_infos(&self, filter: ProductQueryFilter)
        -> Result<Vec<ProductInfoDetail>, CatalogApiError>;

    async fn fetch_product_info(&self, id: i64) -> Result<Option<ProductInfoDetail>, CatalogApiError>;
}
