use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use b2b_engine::{
    db_types::OrderState,
    events::EventProducers,
    order_objects::OrderDetail,
    OrderFlowApi,
    OrderFlowApiError,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{
    helpers::{send, token_header, BUYER_TOKEN},
    mocks::MockOrderManager,
};
use crate::routes::{MyOrdersRoute, PlaceOrderRoute};

fn configure(orders: MockOrderManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(OrderFlowApi::new(orders, EventProducers::default())))
            .service(MyOrdersRoute::<MockOrderManager>::new())
            .service(PlaceOrderRoute::<MockOrderManager>::new());
    }
}

async fn place(orders: MockOrderManager, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let req = TestRequest::post().uri("/order").insert_header(token_header(BUYER_TOKEN)).set_json(body);
    send(req, configure(orders)).await
}

#[actix_web::test]
async fn place_order() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders
        .expect_place_order()
        .withf(|user_id, order_id, contact_id| *user_id == 1 && *order_id == 7 && *contact_id == 11)
        .times(1)
        .returning(|_, _, _| Ok(true));
    let (status, body) = place(orders, json!({ "id": "7", "contact": 11 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true }));
}

#[actix_web::test]
async fn place_order_needs_a_contact() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_place_order().never();
    let (status, body) = place(orders, json!({ "id": 7 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Not all required arguments were provided" }));
}

#[actix_web::test]
async fn place_order_with_non_numeric_id() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_place_order().never();
    let (status, body) = place(orders, json!({ "id": "seven", "contact": 11 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Not all required arguments were provided");
}

#[actix_web::test]
async fn placing_something_that_is_not_your_basket() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_place_order().times(1).returning(|_, _, _| Ok(false));
    let (status, body) = place(orders, json!({ "id": 8, "contact": 11 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Not all required arguments were provided");
}

#[actix_web::test]
async fn placing_with_someone_elses_contact() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_place_order().times(1).returning(|_, _, _| Err(OrderFlowApiError::InvalidContact));
    let (status, body) = place(orders, json!({ "id": 7, "contact": 12 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Invalid arguments" }));
}

#[actix_web::test]
async fn order_history() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_user().withf(|user_id| *user_id == 1).returning(|_| {
        let dt = Utc.with_ymd_and_hms(2024, 3, 5, 16, 45, 0).unwrap();
        Ok(vec![OrderDetail::new(7, OrderState::New, dt, Some(11), vec![])])
    });
    let req = TestRequest::get().uri("/order").insert_header(token_header(BUYER_TOKEN));
    let (status, body) = send(req, configure(orders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": 7,
            "ordered_items": [],
            "state": "new",
            "dt": "2024-03-05T16:45:00Z",
            "total_sum": 0,
            "contact": 11
        }])
    );
}

#[actix_web::test]
async fn order_history_needs_a_login() {
    let _ = env_logger::try_init();
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_user().never();
    let (status, body) = send(TestRequest::get().uri("/order"), configure(orders)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["Error"], "Log in required");
}
