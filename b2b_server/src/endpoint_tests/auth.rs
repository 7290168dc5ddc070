use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use b2b_engine::{db_types::UserCredentials, helpers::hash_password, BasketApi};
use serde_json::json;

use super::{
    helpers::{auth_manager, send, send_with_auth, token_header, BUYER_TOKEN},
    mocks::{MockAuthManager, MockBasketManager},
};
use crate::routes::{BasketRoute, LoginRoute};

const PASSWORD: &str = "k4ngar00-jump";

fn configure(cfg: &mut ServiceConfig) {
    let mut basket = MockBasketManager::new();
    basket.expect_fetch_basket().returning(|_| Ok(vec![]));
    cfg.app_data(web::Data::new(BasketApi::new(basket)))
        .service(LoginRoute::<MockAuthManager>::new())
        .service(BasketRoute::<MockBasketManager>::new());
}

fn with_credentials(is_active: bool) -> MockAuthManager {
    let mut auth = auth_manager();
    let password_hash = hash_password(PASSWORD).unwrap();
    auth.expect_fetch_credentials().returning(move |email| {
        Ok((email == "zakupki@romashka.ru").then(|| UserCredentials {
            user_id: 1,
            password_hash: password_hash.clone(),
            is_active,
        }))
    });
    auth.expect_fetch_or_create_token().withf(|user_id, _| *user_id == 1).returning(|_, _| Ok(BUYER_TOKEN.into()));
    auth
}

#[actix_web::test]
async fn login() {
    let _ = env_logger::try_init();
    let req = TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "email": "zakupki@romashka.ru", "password": PASSWORD }));
    let (status, body) = send_with_auth(req, with_credentials(true), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true, "Token": BUYER_TOKEN }));
}

#[actix_web::test]
async fn login_with_wrong_password() {
    let _ = env_logger::try_init();
    let req = TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "email": "zakupki@romashka.ru", "password": "not-my-password" }));
    let (status, body) = send_with_auth(req, with_credentials(true), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Could not authorize" }));
}

#[actix_web::test]
async fn login_before_confirming_email() {
    let _ = env_logger::try_init();
    let req = TestRequest::post()
        .uri("/user/login")
        .set_json(json!({ "email": "zakupki@romashka.ru", "password": PASSWORD }));
    let (status, body) = send_with_auth(req, with_credentials(false), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Could not authorize");
}

#[actix_web::test]
async fn login_for_unknown_user() {
    let _ = env_logger::try_init();
    let req =
        TestRequest::post().uri("/user/login").set_json(json!({ "email": "nobody@example.com", "password": PASSWORD }));
    let (status, _) = send_with_auth(req, with_credentials(true), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_without_password() {
    let _ = env_logger::try_init();
    let req = TestRequest::post().uri("/user/login").set_json(json!({ "email": "zakupki@romashka.ru" }));
    let (status, body) = send(req, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Not all required arguments were provided");
}

#[actix_web::test]
async fn valid_token() {
    let _ = env_logger::try_init();
    let req = TestRequest::get().uri("/basket").insert_header(token_header(BUYER_TOKEN));
    let (status, body) = send(req, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn unknown_token() {
    let _ = env_logger::try_init();
    let req = TestRequest::get().uri("/basket").insert_header(token_header("0000000000000000000000000000000000000000"));
    let (status, body) = send(req, configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "Status": false, "Error": "Invalid token" }));
}

#[actix_web::test]
async fn wrong_authorization_scheme() {
    let _ = env_logger::try_init();
    let req = TestRequest::get().uri("/basket").insert_header(("Authorization", format!("Bearer {BUYER_TOKEN}")));
    let (status, body) = send(req, configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["Error"], "Invalid token");
}

#[actix_web::test]
async fn request_body_that_is_not_json() {
    let _ = env_logger::try_init();
    let req = TestRequest::post()
        .uri("/user/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("email=zakupki@romashka.ru");
    let (status, body) = send(req, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Invalid request format" }));
}
