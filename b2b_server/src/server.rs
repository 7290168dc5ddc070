use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use b2b_engine::{
    events::{EventHandlers, EventProducers},
    AccountApi,
    AuthApi,
    BasketApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::TokenAuthMiddlewareFactory,
    config::ServerConfig,
    errors::ServerError,
    notifications::{build_hooks, EmailNotifier},
    routes::{
        health,
        AddToBasketRoute,
        BasketRoute,
        CategoriesRoute,
        CategoryRoute,
        ConfirmEmailRoute,
        ContactsRoute,
        CreateContactRoute,
        DeleteContactsRoute,
        LoginRoute,
        MyOrdersRoute,
        PartnerOrdersRoute,
        PartnerStateRoute,
        PasswordResetConfirmRoute,
        PasswordResetRoute,
        PlaceOrderRoute,
        ProductRoute,
        ProductsRoute,
        RegisterRoute,
        RemoveFromBasketRoute,
        ShopRoute,
        ShopsRoute,
        UpdateBasketRoute,
        UpdateContactRoute,
        UpdatePartnerOrderRoute,
        UpdatePartnerStateRoute,
        UpdatePriceListRoute,
        UpdateUserDetailsRoute,
        UserDetailsRoute,
    },
};

/// Bodies that are not valid JSON, or do not fit the request type, get the "Invalid request format" envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not read the request body. {err}");
        ServerError::InvalidRequestFormat.into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not read the query string. {err}");
        ServerError::InvalidArguments.into()
    })
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let notifier = EmailNotifier::new(&config.email)?;
    let handlers = EventHandlers::new(config.event_buffer_size, build_hooks(notifier));
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::BackendError(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let bind = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let accounts_api = AccountApi::new(db.clone(), producers.clone());
        let auth_api = AuthApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let basket_api = BasketApi::new(db.clone());
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let api_scope = web::scope("/api/v1")
            .wrap(TokenAuthMiddlewareFactory::<SqliteDatabase>::new())
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(ConfirmEmailRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(PasswordResetRoute::<SqliteDatabase>::new())
            .service(PasswordResetConfirmRoute::<SqliteDatabase>::new())
            .service(UserDetailsRoute::<SqliteDatabase>::new())
            .service(UpdateUserDetailsRoute::<SqliteDatabase>::new())
            .service(ContactsRoute::<SqliteDatabase>::new())
            .service(CreateContactRoute::<SqliteDatabase>::new())
            .service(UpdateContactRoute::<SqliteDatabase>::new())
            .service(DeleteContactsRoute::<SqliteDatabase>::new())
            .service(CategoriesRoute::<SqliteDatabase>::new())
            .service(CategoryRoute::<SqliteDatabase>::new())
            .service(ShopsRoute::<SqliteDatabase>::new())
            .service(ShopRoute::<SqliteDatabase>::new())
            .service(ProductsRoute::<SqliteDatabase>::new())
            .service(ProductRoute::<SqliteDatabase>::new())
            .service(BasketRoute::<SqliteDatabase>::new())
            .service(AddToBasketRoute::<SqliteDatabase>::new())
            .service(UpdateBasketRoute::<SqliteDatabase>::new())
            .service(RemoveFromBasketRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(PlaceOrderRoute::<SqliteDatabase>::new())
            .service(UpdatePriceListRoute::<SqliteDatabase>::new())
            .service(PartnerStateRoute::<SqliteDatabase>::new())
            .service(UpdatePartnerStateRoute::<SqliteDatabase>::new())
            .service(PartnerOrdersRoute::<SqliteDatabase>::new())
            .service(UpdatePartnerOrderRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("b2b::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(basket_api))
            .app_data(web::Data::new(orders_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind(bind.clone())?
    .run();
    info!("💻️ Listening on {}:{}", bind.0, bind.1);
    Ok(srv)
}
