//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution.
use actix_web::{get, web, HttpResponse, Responder};
use b2b_engine::{
    account_objects::UserDetailsUpdate,
    catalog_objects::ProductQueryFilter,
    db_types::UserType,
    traits::{AccountManagement, AuthManagement, BasketManagement, CatalogManagement, OrderManagement},
    AccountApi,
    AuthApi,
    BasketApi,
    CatalogApi,
    OrderFlowApi,
};
use log::*;
use serde_json::json;

use crate::{
    auth::AuthenticatedUser,
    config::ServerConfig,
    data_objects::{
        ConfirmEmailRequest,
        ContactRequest,
        ItemsRequest,
        LoginRequest,
        OrderStateRequest,
        PartnerStateRequest,
        PartnerUpdateRequest,
        PasswordResetConfirmation,
        PasswordResetRequest,
        PlaceOrderRequest,
        ProductQuery,
        RegisterRequest,
    },
    errors::ServerError,
    helpers::{fetch_price_list, validate_feed_url},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:expr),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),*]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

fn status_ok() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "Status": true }))
}

fn count(key: &str, n: u64) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "Status": true, key: n }))
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Accounts  ----------------------------------------------------
route!(register => Post "/user/register" impl AccountManagement);
/// Creates an inactive account. The confirmation token is e-mailed to the new user.
pub async fn register<B: AccountManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received registration request");
    let (user, password) = body.into_inner().into_new_user()?;
    let user = api.register(user, &password).await?;
    debug!("💻️ Registered user #{}", user.id);
    Ok(status_ok())
}

route!(confirm_email => Post "/user/register/confirm" impl AccountManagement);
pub async fn confirm_email<B: AccountManagement>(
    body: web::Json<ConfirmEmailRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (Some(email), Some(token)) = (body.email.as_deref(), body.token.as_deref()) else {
        return Err(ServerError::MissingArguments);
    };
    trace!("💻️ Confirming e-mail for {email}");
    api.confirm_email(email, token).await?;
    Ok(status_ok())
}

route!(login => Post "/user/login" impl AuthManagement);
/// Exchanges an e-mail and password for the user's API token.
pub async fn login<B: AuthManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return Err(ServerError::MissingArguments);
    };
    trace!("💻️ Login request for {email}");
    let token = api.login(email, password).await?;
    Ok(HttpResponse::Ok().json(json!({ "Status": true, "Token": token })))
}

route!(password_reset => Post "/user/password_reset" impl AccountManagement);
pub async fn password_reset<B: AccountManagement>(
    body: web::Json<PasswordResetRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let email = body.email.as_deref().ok_or(ServerError::MissingArguments)?;
    api.request_password_reset(email).await?;
    Ok(status_ok())
}

route!(password_reset_confirm => Post "/user/password_reset/confirm" impl AccountManagement);
pub async fn password_reset_confirm<B: AccountManagement>(
    body: web::Json<PasswordResetConfirmation>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (Some(token), Some(password)) = (body.token.as_deref(), body.password.as_deref()) else {
        return Err(ServerError::MissingArguments);
    };
    api.reset_password(token, password).await?;
    Ok(status_ok())
}

route!(user_details => Get "/user/details" impl AccountManagement);
pub async fn user_details<B: AccountManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET user details for #{}", user.id);
    let details = api.user_details(user.id).await?;
    Ok(HttpResponse::Ok().json(details))
}

route!(update_user_details => Post "/user/details" impl AccountManagement);
/// Partial update of the caller's details. Sending `password` changes the password.
pub async fn update_user_details<B: AccountManagement>(
    user: AuthenticatedUser,
    body: web::Json<UserDetailsUpdate>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST user details for #{}", user.id);
    api.update_details(user.id, body.into_inner()).await?;
    Ok(status_ok())
}

//----------------------------------------------   Contacts  ----------------------------------------------------
route!(contacts => Get "/user/contact" impl AccountManagement);
pub async fn contacts<B: AccountManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contacts = api.contacts(user.id).await?;
    Ok(HttpResponse::Ok().json(contacts))
}

route!(create_contact => Post "/user/contact" impl AccountManagement);
pub async fn create_contact<B: AccountManagement>(
    user: AuthenticatedUser,
    body: web::Json<ContactRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contact = body.into_inner().into_new_contact()?;
    let contact = api.create_contact(user.id, contact).await?;
    debug!("💻️ User #{} added contact #{}", user.id, contact.id);
    Ok(status_ok())
}

route!(update_contact => Put "/user/contact" impl AccountManagement);
pub async fn update_contact<B: AccountManagement>(
    user: AuthenticatedUser,
    body: web::Json<ContactRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (id, update) = body.into_inner().into_update()?;
    api.update_contact(user.id, id, update).await?;
    Ok(status_ok())
}

route!(delete_contacts => Delete "/user/contact" impl AccountManagement);
pub async fn delete_contacts<B: AccountManagement>(
    user: AuthenticatedUser,
    body: web::Json<ItemsRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let ids = body.id_list()?;
    let deleted = api.delete_contacts(user.id, &ids).await?;
    Ok(count("Deleted", deleted))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(categories => Get "/categories" impl CatalogManagement);
pub async fn categories<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

route!(category => Get "/categories/{id}" impl CatalogManagement);
pub async fn category<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let category = api.category(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Category {id}")))?;
    Ok(HttpResponse::Ok().json(category))
}

route!(shops => Get "/shops" impl CatalogManagement);
pub async fn shops<B: CatalogManagement>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let shops = api.shops().await?;
    Ok(HttpResponse::Ok().json(shops))
}

route!(shop => Get "/shops/{id}" impl CatalogManagement);
pub async fn shop<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let shop = api.shop(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Shop {id}")))?;
    Ok(HttpResponse::Ok().json(shop))
}

route!(products => Get "/products" impl CatalogManagement);
/// SKUs of the shops that are accepting orders, optionally narrowed by `shop_id` and `category_id`.
pub async fn products<B: CatalogManagement>(
    query: web::Query<ProductQuery>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    trace!("💻️ GET products for {query:?}");
    let filter = ProductQueryFilter { shop_id: query.shop_id, category_id: query.category_id };
    let products = api.products(filter).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(product => Get "/products/{id}" impl CatalogManagement);
pub async fn product<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let product = api.product(id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Product {id}")))?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Basket  ----------------------------------------------------
route!(basket => Get "/basket" impl BasketManagement);
pub async fn basket<B: BasketManagement>(
    user: AuthenticatedUser,
    api: web::Data<BasketApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET basket for #{}", user.id);
    let basket = api.basket(user.id).await?;
    Ok(HttpResponse::Ok().json(basket))
}

route!(add_to_basket => Post "/basket" impl BasketManagement);
/// `items` is a JSON-encoded list of `{product_info, quantity}`. Malformed entries are skipped and the number of
/// lines created is returned.
pub async fn add_to_basket<B: BasketManagement>(
    user: AuthenticatedUser,
    body: web::Json<ItemsRequest>,
    api: web::Data<BasketApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let items = body.new_order_items()?;
    let created = api.add_items(user.id, &items).await?;
    Ok(count("Created", created))
}

route!(update_basket => Put "/basket" impl BasketManagement);
pub async fn update_basket<B: BasketManagement>(
    user: AuthenticatedUser,
    body: web::Json<ItemsRequest>,
    api: web::Data<BasketApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let updates = body.order_item_updates()?;
    let updated = api.update_items(user.id, &updates).await?;
    Ok(count("Updated", updated))
}

route!(remove_from_basket => Delete "/basket" impl BasketManagement);
pub async fn remove_from_basket<B: BasketManagement>(
    user: AuthenticatedUser,
    body: web::Json<ItemsRequest>,
    api: web::Data<BasketApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let ids = body.id_list()?;
    let deleted = api.delete_items(user.id, &ids).await?;
    Ok(count("Deleted", deleted))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(my_orders => Get "/order" impl OrderManagement);
pub async fn my_orders<B: OrderManagement>(
    user: AuthenticatedUser,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for #{}", user.id);
    let orders = api.orders_for_user(user.id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(place_order => Post "/order" impl OrderManagement);
/// Turns the basket `id` into an order for delivery to `contact`.
pub async fn place_order<B: OrderManagement>(
    user: AuthenticatedUser,
    body: web::Json<PlaceOrderRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (order_id, contact_id) = body.ids()?;
    debug!("💻️ User #{} is placing order #{order_id}", user.id);
    if api.place_order(&user, order_id, contact_id).await? {
        Ok(status_ok())
    } else {
        Err(ServerError::MissingArguments)
    }
}

//----------------------------------------------   Partners  ----------------------------------------------------
route!(update_price_list => Post "/partner/update" impl CatalogManagement where requires [UserType::Shop]);
/// Downloads the supplier's YAML price list from `url` and replaces their catalog with it.
pub async fn update_price_list<B: CatalogManagement>(
    user: AuthenticatedUser,
    body: web::Json<PartnerUpdateRequest>,
    config: web::Data<ServerConfig>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let url = body.url.as_deref().ok_or(ServerError::MissingArguments)?;
    let url = validate_feed_url(url)?;
    let feed = fetch_price_list(&url, config.feed_timeout).await?;
    let summary = api.import_price_list(&user, Some(url.as_str()), &feed).await?;
    debug!("💻️ Imported {} products for shop #{}", summary.products, summary.shop_id);
    Ok(status_ok())
}

route!(partner_state => Get "/partner/state" impl CatalogManagement where requires [UserType::Shop]);
pub async fn partner_state<B: CatalogManagement>(
    user: AuthenticatedUser,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let shop = api.shop_for_user(&user).await?;
    Ok(HttpResponse::Ok().json(shop))
}

route!(update_partner_state => Post "/partner/state" impl CatalogManagement where requires [UserType::Shop]);
/// Opens or closes the supplier's shop. `state` takes the usual truthy and falsy strings ("on", "off", "1", ...).
pub async fn update_partner_state<B: CatalogManagement>(
    user: AuthenticatedUser,
    body: web::Json<PartnerStateRequest>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let state = body.state()?;
    api.set_shop_state(&user, state).await?;
    Ok(status_ok())
}

route!(partner_orders => Get "/partner/orders" impl OrderManagement where requires [UserType::Shop]);
pub async fn partner_orders<B: OrderManagement>(
    user: AuthenticatedUser,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET partner orders for #{}", user.id);
    let orders = api.orders_for_supplier(user.id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(update_partner_order => Put "/partner/orders" impl OrderManagement where requires [UserType::Shop]);
/// Moves a placed order containing the supplier's goods to a fulfilment state.
pub async fn update_partner_order<B: OrderManagement>(
    user: AuthenticatedUser,
    body: web::Json<OrderStateRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (order_id, state) = body.parts()?;
    api.update_order_state(user.id, order_id, state).await?;
    Ok(status_ok())
}
