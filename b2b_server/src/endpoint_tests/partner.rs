use actix_web::{
    dev::ServerHandle,
    http::StatusCode,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpResponse,
    HttpServer,
};
use b2b_engine::{
    catalog_objects::ImportSummary,
    db_types::{Order, OrderState, Shop},
    events::EventProducers,
    CatalogApi,
    OrderFlowApi,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{
    helpers::{send, token_header, BUYER_TOKEN, SHOP_TOKEN},
    mocks::{MockCatalogManager, MockOrderManager},
};
use crate::{
    config::ServerConfig,
    routes::{
        PartnerOrdersRoute,
        PartnerStateRoute,
        UpdatePartnerOrderRoute,
        UpdatePartnerStateRoute,
        UpdatePriceListRoute,
    },
};

fn configure(catalog: MockCatalogManager, orders: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ServerConfig::default()))
            .app_data(web::Data::new(CatalogApi::new(catalog)))
            .app_data(web::Data::new(OrderFlowApi::new(orders, EventProducers::default())))
            .service(UpdatePriceListRoute::<MockCatalogManager>::new())
            .service(PartnerStateRoute::<MockCatalogManager>::new())
            .service(UpdatePartnerStateRoute::<MockCatalogManager>::new())
            .service(PartnerOrdersRoute::<MockOrderManager>::new())
            .service(UpdatePartnerOrderRoute::<MockOrderManager>::new());
    }
}

fn catalog_only(catalog: MockCatalogManager) -> impl FnOnce(&mut ServiceConfig) {
    configure(catalog, MockOrderManager::new())
}

fn orders_only(orders: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    configure(MockCatalogManager::new(), orders)
}

const PRICE_LIST: &str = r#"
shop: Связной
categories:
  - id: 224
    name: Смартфоны
goods:
  - id: 4216292
    category: 224
    model: apple/iphone/xs-max
    name: Смартфон Apple iPhone XS Max 512GB (золотистый)
    price: 110000
    price_rrc: 116990
    quantity: 14
"#;

/// Serves `body` at `/shop1.yaml` on a free local port. Returns the server's base URL.
fn serve_price_list(body: &'static str) -> (String, ServerHandle) {
    let server = HttpServer::new(move || {
        App::new().route(
            "/shop1.yaml",
            web::get().to(move || async move { HttpResponse::Ok().content_type("application/x-yaml").body(body) }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Could not bind the price list server");
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle)
}

async fn update_from(url: String, catalog: MockCatalogManager) -> (StatusCode, serde_json::Value) {
    let req = TestRequest::post()
        .uri("/partner/update")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "url": url }));
    send(req, catalog_only(catalog)).await
}

fn svyaznoy(state: bool) -> Shop {
    Shop { id: 1, name: "Связной".into(), url: None, user_id: Some(2), state }
}

#[actix_web::test]
async fn buyers_are_turned_away() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_shop_for_user().never();
    let req = TestRequest::get().uri("/partner/state").insert_header(token_header(BUYER_TOKEN));
    let (status, body) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "Status": false, "Error": "exclusively for stores" }));
}

#[actix_web::test]
async fn anonymous_partner_request() {
    let _ = env_logger::try_init();
    let req = TestRequest::get().uri("/partner/orders");
    let (status, body) = send(req, orders_only(MockOrderManager::new())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "Status": false, "Error": "Log in required" }));
}

#[actix_web::test]
async fn shop_state() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_shop_for_user().withf(|user_id| *user_id == 2).returning(|_| Ok(Some(svyaznoy(true))));
    let req = TestRequest::get().uri("/partner/state").insert_header(token_header(SHOP_TOKEN));
    let (status, body) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Связной", "state": true }));
}

#[actix_web::test]
async fn shop_state_before_the_first_import() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_shop_for_user().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/partner/state").insert_header(token_header(SHOP_TOKEN));
    let (status, _) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn close_the_shop() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_set_shop_state()
        .withf(|user_id, state| *user_id == 2 && !*state)
        .times(1)
        .returning(|_, state| Ok(Some(svyaznoy(state))));
    let req = TestRequest::post()
        .uri("/partner/state")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "state": "off" }));
    let (status, body) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true }));
}

#[actix_web::test]
async fn shop_state_that_is_not_a_truth_value() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_set_shop_state().never();
    let req = TestRequest::post()
        .uri("/partner/state")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "state": "maybe" }));
    let (status, body) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Status"], false);
    assert_eq!(body["Errors"]["state"][0], "invalid truth value 'maybe'");
}

#[actix_web::test]
async fn price_list_update_without_url() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_import_price_list().never();
    let req = TestRequest::post().uri("/partner/update").insert_header(token_header(SHOP_TOKEN)).set_json(json!({}));
    let (status, body) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Not all required arguments were provided");
}

#[actix_web::test]
async fn price_list_update_from_a_non_http_url() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_import_price_list().never();
    let req = TestRequest::post()
        .uri("/partner/update")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "url": "ftp://example.com/shop1.yaml" }));
    let (status, body) = send(req, catalog_only(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Invalid arguments" }));
}

#[actix_web::test]
async fn price_list_update() {
    let _ = env_logger::try_init();
    let (base, server) = serve_price_list(PRICE_LIST);
    let expected_url = format!("{base}/shop1.yaml");
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_import_price_list()
        .withf(move |user_id, source_url, feed| {
            *user_id == 2
                && source_url.as_deref() == Some(expected_url.as_str())
                && feed.shop == "Связной"
                && feed.goods.len() == 1
        })
        .times(1)
        .returning(|_, _, feed| Ok(ImportSummary { shop_id: 1, categories: 1, products: feed.goods.len() }));
    let (status, body) = update_from(format!("{base}/shop1.yaml"), catalog).await;
    server.stop(true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true }));
}

#[actix_web::test]
async fn price_list_that_cannot_be_downloaded() {
    let _ = env_logger::try_init();
    let (base, server) = serve_price_list(PRICE_LIST);
    let mut catalog = MockCatalogManager::new();
    catalog.expect_import_price_list().never();
    let (status, body) = update_from(format!("{base}/missing.yaml"), catalog).await;
    server.stop(true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Status"], false);
    assert!(body["Errors"].as_str().unwrap().starts_with("Could not load the price list."), "{body}");
}

#[actix_web::test]
async fn price_list_that_is_not_yaml() {
    let _ = env_logger::try_init();
    let (base, server) = serve_price_list("<html><body>Maintenance</body></html>");
    let mut catalog = MockCatalogManager::new();
    catalog.expect_import_price_list().never();
    let (status, body) = update_from(format!("{base}/shop1.yaml"), catalog).await;
    server.stop(true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["Errors"].as_str().unwrap().starts_with("Could not load the price list."), "{body}");
}

#[actix_web::test]
async fn supplier_orders() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_supplier().withf(|user_id| *user_id == 2).times(1).returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/partner/orders").insert_header(token_header(SHOP_TOKEN));
    let (status, body) = send(req, orders_only(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn mark_an_order_as_sent() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders
        .expect_update_order_state_for_supplier()
        .withf(|user_id, order_id, state| *user_id == 2 && *order_id == 7 && *state == OrderState::Sent)
        .times(1)
        .returning(|_, order_id, state| {
            let dt = Utc.with_ymd_and_hms(2024, 3, 5, 16, 45, 0).unwrap();
            Ok(Some(Order { id: order_id, user_id: 1, dt, state, contact_id: Some(11) }))
        });
    let req = TestRequest::put()
        .uri("/partner/orders")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "id": 7, "state": "sent" }));
    let (status, body) = send(req, orders_only(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true }));
}

#[actix_web::test]
async fn suppliers_cannot_reopen_an_order() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_update_order_state_for_supplier().never();
    let req = TestRequest::put()
        .uri("/partner/orders")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "id": 7, "state": "new" }));
    let (status, body) = send(req, orders_only(orders)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Invalid arguments");
}

#[actix_web::test]
async fn fulfilment_of_someone_elses_order() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_update_order_state_for_supplier().returning(|_, _, _| Ok(None));
    let req = TestRequest::put()
        .uri("/partner/orders")
        .insert_header(token_header(SHOP_TOKEN))
        .set_json(json!({ "id": "8", "state": "confirmed" }));
    let (status, body) = send(req, orders_only(orders)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Errors"], "Order #8 was not found");
}
