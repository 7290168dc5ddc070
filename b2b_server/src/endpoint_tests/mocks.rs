use b2b_engine::{
    catalog_objects::{ImportSummary, ProductInfoDetail, ProductQueryFilter},
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
        Shop,
        User,
        UserCredentials,
        UserUpdate,
    },
    feed::PriceFeed,
    order_objects::OrderDetail,
    traits::{AccountManagement, AuthManagement, BasketManagement, CatalogManagement, OrderManagement},
    AccountApiError,
    AuthApiError,
    BasketApiError,
    CatalogApiError,
    OrderFlowApiError,
};
use mockall::mock;

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn create_user(&self, user: &NewUser, password_hash: &str, confirm_token: &str) -> Result<User, AccountApiError>;
        async fn confirm_email(&self, email: &str, token: &str) -> Result<bool, AccountApiError>;
        async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;
        async fn update_user(&self, user_id: i64, update: UserUpdate) -> Result<User, AccountApiError>;
        async fn fetch_contacts(&self, user_id: i64) -> Result<Vec<Contact>, AccountApiError>;
        async fn create_contact(&self, user_id: i64, contact: &NewContact) -> Result<Contact, AccountApiError>;
        async fn update_contact(&self, user_id: i64, contact_id: i64, update: ContactUpdate) -> Result<Option<Contact>, AccountApiError>;
        async fn delete_contacts(&self, user_id: i64, ids: &[i64]) -> Result<u64, AccountApiError>;
        async fn create_password_reset_token(&self, user_id: i64, token: &str) -> Result<(), AccountApiError>;
        async fn reset_password(&self, token: &str, password_hash: &str) -> Result<Option<User>, AccountApiError>;
    }
}

mock! {
    pub AuthManager {}
    impl AuthManagement for AuthManager {
        async fn fetch_credentials(&self, email: &str) -> Result<Option<UserCredentials>, AuthApiError>;
        async fn fetch_or_create_token(&self, user_id: i64, candidate: &str) -> Result<String, AuthApiError>;
        async fn fetch_user_for_token(&self, token: &str) -> Result<Option<User>, AuthApiError>;
    }
}

mock! {
    pub CatalogManager {}
    impl CatalogManagement for CatalogManager {
        async fn import_price_list(&self, user_id: i64, source_url: Option<String>, feed: &PriceFeed) -> Result<ImportSummary, CatalogApiError>;
        async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;
        async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;
        async fn fetch_shops(&self) -> Result<Vec<Shop>, CatalogApiError>;
        async fn fetch_shop(&self, id: i64) -> Result<Option<Shop>, CatalogApiError>;
        async fn fetch_shop_for_user(&self, user_id: i64) -> Result<Option<Shop>, CatalogApiError>;
        async fn set_shop_state(&self, user_id: i64, state: bool) -> Result<Option<Shop>, CatalogApiError>;
        async fn fetch_product_infos(&self, filter: ProductQueryFilter) -> Result<Vec<ProductInfoDetail>, CatalogApiError>;
        async fn fetch_product_info(&self, id: i64) -> Result<Option<ProductInfoDetail>, CatalogApiError>;
    }
}

mock! {
    pub BasketManager {}
    impl BasketManagement for BasketManager {
        async fn fetch_or_create_basket(&self, user_id: i64) -> Result<Order, BasketApiError>;
        async fn fetch_basket(&self, user_id: i64) -> Result<Vec<OrderDetail>, BasketApiError>;
        async fn product_info_exists(&self, product_info_id: i64) -> Result<bool, BasketApiError>;
        async fn add_basket_item(&self, user_id: i64, item: &NewOrderItem) -> Result<OrderItem, BasketApiError>;
        async fn update_basket_item(&self, user_id: i64, item_id: i64, quantity: i64) -> Result<u64, BasketApiError>;
        async fn delete_basket_items(&self, user_id: i64, ids: &[i64]) -> Result<u64, BasketApiError>;
    }
}

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn place_order(&self, user_id: i64, order_id: i64, contact_id: i64) -> Result<bool, OrderFlowApiError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderDetail>, OrderFlowApiError>;
        async fn fetch_order_owner(&self, order_id: i64) -> Result<Option<User>, OrderFlowApiError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError>;
        async fn fetch_orders_for_supplier(&self, supplier_id: i64) -> Result<Vec<OrderDetail>, OrderFlowApiError>;
        async fn update_order_state_for_supplier(&self, supplier_id: i64, order_id: i64, state: OrderState) -> Result<Option<Order>, OrderFlowApiError>;
    }
}
