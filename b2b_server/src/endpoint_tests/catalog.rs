use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use b2b_engine::{
    catalog_objects::{ProductInfoDetail, ProductParameterValue, ProductSummary},
    db_types::{Category, Price, Shop},
    CatalogApi,
};
use serde_json::json;

use super::{
    helpers::{send, token_header, BUYER_TOKEN},
    mocks::MockCatalogManager,
};
use crate::routes::{CategoriesRoute, CategoryRoute, ProductRoute, ProductsRoute, ShopRoute, ShopsRoute};

fn configure(catalog: MockCatalogManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(CatalogApi::new(catalog)))
            .service(CategoriesRoute::<MockCatalogManager>::new())
            .service(CategoryRoute::<MockCatalogManager>::new())
            .service(ShopsRoute::<MockCatalogManager>::new())
            .service(ShopRoute::<MockCatalogManager>::new())
            .service(ProductsRoute::<MockCatalogManager>::new())
            .service(ProductRoute::<MockCatalogManager>::new());
    }
}

fn svyaznoy() -> Shop {
    Shop { id: 1, name: "Связной".into(), url: Some("https://example.com/shop1.yaml".into()), user_id: Some(2), state: true }
}

fn phone() -> ProductInfoDetail {
    ProductInfoDetail {
        id: 3,
        model: "apple/iphone/xs-max".into(),
        external_id: 4216292,
        product: ProductSummary { name: "Смартфон Apple iPhone XS Max 512GB (золотистый)".into(), category: "Смартфоны".into() },
        shop: 1,
        quantity: 14,
        price: Price::from(110_000),
        price_rrc: Price::from(116_990),
        product_parameters: vec![ProductParameterValue { parameter: "Диагональ (дюйм)".into(), value: "6.5".into() }],
    }
}

#[actix_web::test]
async fn categories_are_public() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_categories().times(1).returning(|| {
        Ok(vec![Category { id: 224, name: "Смартфоны".into() }, Category { id: 15, name: "Аксессуары".into() }])
    });
    let (status, body) = send(TestRequest::get().uri("/categories"), configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 224, "name": "Смартфоны" }, { "id": 15, "name": "Аксессуары" }]));
}

#[actix_web::test]
async fn unknown_category() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_category().withf(|id| *id == 404).returning(|_| Ok(None));
    let (status, body) = send(TestRequest::get().uri("/categories/404"), configure(catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "Status": false, "Errors": "Category 404" }));
}

#[actix_web::test]
async fn shops_hide_their_owner_and_feed() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_shops().returning(|| Ok(vec![svyaznoy()]));
    let req = TestRequest::get().uri("/shops").insert_header(token_header(BUYER_TOKEN));
    let (status, body) = send(req, configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 1, "name": "Связной", "state": true }]));
}

#[actix_web::test]
async fn single_shop() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_shop().withf(|id| *id == 1).returning(|_| Ok(Some(svyaznoy())));
    let (status, body) = send(TestRequest::get().uri("/shops/1"), configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Связной");
}

#[actix_web::test]
async fn products_filtered_by_shop_and_category() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_fetch_product_infos()
        .withf(|f| f.shop_id == Some(1) && f.category_id == Some(224))
        .times(1)
        .returning(|_| Ok(vec![phone()]));
    let req = TestRequest::get().uri("/products?shop_id=1&category_id=224");
    let (status, body) = send(req, configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["model"], "apple/iphone/xs-max");
    assert_eq!(body[0]["price"], 110_000);
    assert_eq!(body[0]["product_parameters"][0]["value"], "6.5");
}

#[actix_web::test]
async fn products_without_a_filter() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog
        .expect_fetch_product_infos()
        .withf(|f| f.shop_id.is_none() && f.category_id.is_none())
        .times(1)
        .returning(|_| Ok(vec![]));
    let (status, body) = send(TestRequest::get().uri("/products"), configure(catalog)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn products_with_a_non_numeric_filter() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product_infos().never();
    let (status, body) = send(TestRequest::get().uri("/products?shop_id=svyaznoy"), configure(catalog)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Invalid arguments");
}

#[actix_web::test]
async fn unknown_product() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalogManager::new();
    catalog.expect_fetch_product_info().returning(|_| Ok(None));
    let (status, body) = send(TestRequest::get().uri("/products/77"), configure(catalog)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["Errors"], "Product 77");
}
