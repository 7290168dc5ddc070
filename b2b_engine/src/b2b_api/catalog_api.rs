use std::fmt::Debug;

use log::*;

use crate::{
    catalog_objects::{ImportSummary, ProductInfoDetail, ProductQueryFilter},
    db_types::{Category, Shop, User},
    feed::PriceFeed,
    traits::CatalogManagement,
    CatalogApiError,
};

/// `CatalogApi` imports supplier price lists and serves the public catalog.
pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Replaces the supplier's catalog with the contents of `feed`.
    ///
    /// The replacement is all-or-nothing: every SKU the shop listed before is deleted and the feed's goods are
    /// created in their place, in one transaction. Any SKU ids handed out previously are no longer valid afterwards.
    pub async fn import_price_list(
        &self,
        user: &User,
        source_url: Option<&str>,
        feed: &PriceFeed,
    ) -> Result<ImportSummary, CatalogApiError> {
        if !user.is_shop() {
            return Err(CatalogApiError::NotAShop);
        }
        feed.validate()?;
        debug!("📦️ Importing {} goods from '{}' for user #{}", feed.goods.len(), feed.shop, user.id);
        let summary = self.db.import_price_list(user.id, source_url.map(str::to_string), feed).await?;
        info!(
            "📦️ Shop #{} now lists {} SKUs in {} categories",
            summary.shop_id, summary.products, summary.categories
        );
        Ok(summary)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        self.db.fetch_categories().await
    }

    pub async fn category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        self.db.fetch_category(id).await
    }

    pub async fn shops(&self) -> Result<Vec<Shop>, CatalogApiError> {
        self.db.fetch_shops().await
    }

    pub async fn shop(&self, id: i64) -> Result<Option<Shop>, CatalogApiError> {
        self.db.fetch_shop(id).await
    }

    pub async fn products(&self, filter: ProductQueryFilter) -> Result<Vec<ProductInfoDetail>, CatalogApiError> {
        self.db.fetch_product_infos(filter).await
    }

    pub async fn product(&self, id: i64) -> Result<Option<ProductInfoDetail>, CatalogApiError> {
        self.db.fetch_product_info(id).await
    }

    /// The supplier's own shop.
    pub async fn shop_for_user(&self, user: &User) -> Result<Shop, CatalogApiError> {
        if !user.is_shop() {
            return Err(CatalogApiError::NotAShop);
        }
        self.db.fetch_shop_for_user(user.id).await?.ok_or(CatalogApiError::ShopNotFound)
    }

    /// Opens or closes the supplier's shop. Closed shops drop out of product listings.
    pub async fn set_shop_state(&self, user: &User, state: bool) -> Result<Shop, CatalogApiError> {
        if !user.is_shop() {
            return Err(CatalogApiError::NotAShop);
        }
        let shop = self.db.set_shop_state(user.id, state).await?.ok_or(CatalogApiError::ShopNotFound)?;
        info!("📦️ Shop #{} is now {}", shop.id, if shop.state { "accepting orders" } else { "closed" });
        Ok(shop)
    }
}
