use actix_web::{
    body::{to_bytes, BoxBody},
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
    HttpResponse,
};
use b2b_engine::{
    db_types::{User, UserType},
    AuthApi,
};
use chrono::{TimeZone, Utc};
use log::debug;
use serde_json::Value;

use super::mocks::MockAuthManager;
use crate::{
    auth::TokenAuthMiddlewareFactory,
    server::{json_config, query_config},
};

pub const BUYER_TOKEN: &str = "3f2a9c0b7d4e1f6a8b5c2d9e0f1a7b3c4d5e6f70";
pub const SHOP_TOKEN: &str = "b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0";

pub fn buyer() -> User {
    User {
        id: 1,
        email: "zakupki@romashka.ru".into(),
        first_name: "Ирина".into(),
        last_name: "Соколова".into(),
        company: "ООО Ромашка".into(),
        position: "Закупщик".into(),
        is_active: true,
        user_type: UserType::Buyer,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub fn supplier() -> User {
    User {
        id: 2,
        email: "opt@svyaznoy.ru".into(),
        first_name: "Олег".into(),
        last_name: "Кузнецов".into(),
        company: "Связной".into(),
        position: "Менеджер".into(),
        is_active: true,
        user_type: UserType::Shop,
        created_at: Utc.with_ymd_and_hms(2024, 2, 14, 9, 30, 0).unwrap(),
    }
}

pub fn auth_manager() -> MockAuthManager {
    let mut auth = MockAuthManager::new();
    auth.expect_fetch_user_for_token().returning(|token| {
        Ok(match token {
            BUYER_TOKEN => Some(buyer()),
            SHOP_TOKEN => Some(supplier()),
            _ => None,
        })
    });
    auth
}

pub fn token_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Token {token}"))
}

/// Sends `req` through an app with token authentication, configured by `configure`, and returns the status and the
/// JSON body.
pub async fn send<F>(req: TestRequest, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    send_with_auth(req, auth_manager(), configure).await
}

pub async fn send_with_auth<F>(req: TestRequest, auth: MockAuthManager, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .app_data(json_config())
        .app_data(query_config())
        .app_data(web::Data::new(AuthApi::new(auth)))
        .service(web::scope("").wrap(TokenAuthMiddlewareFactory::<MockAuthManager>::new()).configure(configure));
    let service = test::init_service(app).await;
    debug!("Making request");
    let res: HttpResponse<BoxBody> = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.map_into_boxed_body().into_parts().1,
        Err(e) => e.error_response(),
    };
    let status = res.status();
    let bytes = to_bytes(res.into_body()).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}
