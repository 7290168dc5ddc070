use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use b2b_engine::{
    db_types::{Contact, User},
    events::EventProducers,
    AccountApi,
};
use serde_json::json;

use super::{
    helpers::{buyer, send, token_header, BUYER_TOKEN},
    mocks::MockAccountManager,
};
use crate::routes::{
    ConfirmEmailRoute,
    ContactsRoute,
    CreateContactRoute,
    DeleteContactsRoute,
    PasswordResetRoute,
    RegisterRoute,
    UpdateContactRoute,
    UserDetailsRoute,
};

fn configure(accounts: MockAccountManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AccountApi::new(accounts, EventProducers::default())))
            .service(RegisterRoute::<MockAccountManager>::new())
            .service(ConfirmEmailRoute::<MockAccountManager>::new())
            .service(PasswordResetRoute::<MockAccountManager>::new())
            .service(UserDetailsRoute::<MockAccountManager>::new())
            .service(ContactsRoute::<MockAccountManager>::new())
            .service(CreateContactRoute::<MockAccountManager>::new())
            .service(UpdateContactRoute::<MockAccountManager>::new())
            .service(DeleteContactsRoute::<MockAccountManager>::new());
    }
}

fn registration() -> serde_json::Value {
    json!({
        "first_name": "Ирина",
        "last_name": "Соколова",
        "email": "zakupki@romashka.ru",
        "password": "k4ngar00-jump",
        "company": "ООО Ромашка",
        "position": "Закупщик"
    })
}

fn office() -> Contact {
    Contact {
        id: 11,
        user_id: 1,
        city: "Москва".into(),
        street: "Тверская".into(),
        house: "7".into(),
        phone: "+7 495 000-00-00".into(),
        ..Default::default()
    }
}

#[actix_web::test]
async fn register() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_by_email().returning(|_| Ok(None));
    accounts
        .expect_create_user()
        .withf(|user, hash, token| user.email == "zakupki@romashka.ru" && hash.starts_with("$argon2") && token.len() == 40)
        .times(1)
        .returning(|user, _, _| Ok(User { is_active: false, email: user.email.clone(), ..buyer() }));
    let req = TestRequest::post().uri("/user/register").set_json(registration());
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true }));
}

#[actix_web::test]
async fn register_with_missing_fields() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_create_user().never();
    let mut data = registration();
    data.as_object_mut().unwrap().remove("company");
    let req = TestRequest::post().uri("/user/register").set_json(data);
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Not all required arguments were provided" }));
}

#[actix_web::test]
async fn register_with_weak_password() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_by_email().returning(|_| Ok(None));
    accounts.expect_create_user().never();
    let mut data = registration();
    data["password"] = json!("12345678");
    let req = TestRequest::post().uri("/user/register").set_json(data);
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Status"], false);
    let problems = body["Errors"]["password"].as_array().unwrap();
    assert!(problems.iter().any(|p| p == "This password is too common."));
    assert!(problems.iter().any(|p| p == "This password is entirely numeric."));
}

#[actix_web::test]
async fn confirm_with_wrong_token() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_confirm_email().returning(|_, _| Ok(false));
    let req = TestRequest::post()
        .uri("/user/register/confirm")
        .set_json(json!({ "email": "zakupki@romashka.ru", "token": "nope" }));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "Status": false, "Errors": "Invalid arguments" }));
}

#[actix_web::test]
async fn password_reset_for_unknown_address() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user_by_email().returning(|_| Ok(None));
    accounts.expect_create_password_reset_token().never();
    let req = TestRequest::post().uri("/user/password_reset").set_json(json!({ "email": "nobody@example.com" }));
    let (status, _) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn contacts_need_a_login() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_contacts().never();
    let req = TestRequest::get().uri("/user/contact");
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "Status": false, "Error": "Log in required" }));
}

#[actix_web::test]
async fn user_details_include_contacts() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_fetch_user().withf(|id| *id == 1).returning(|_| Ok(Some(buyer())));
    accounts.expect_fetch_contacts().withf(|id| *id == 1).returning(|_| Ok(vec![office()]));
    let req = TestRequest::get().uri("/user/details").insert_header(token_header(BUYER_TOKEN));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "zakupki@romashka.ru");
    assert_eq!(body["contacts"][0]["city"], "Москва");
    assert!(body["contacts"][0].get("user_id").is_none());
}

#[actix_web::test]
async fn create_contact() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts
        .expect_create_contact()
        .withf(|user_id, c| *user_id == 1 && c.city == "Москва" && c.building.is_empty())
        .times(1)
        .returning(|_, _| Ok(office()));
    let req = TestRequest::post()
        .uri("/user/contact")
        .insert_header(token_header(BUYER_TOKEN))
        .set_json(json!({ "city": "Москва", "street": "Тверская", "house": "7", "phone": "+7 495 000-00-00" }));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true }));
}

#[actix_web::test]
async fn create_contact_without_phone() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_create_contact().never();
    let req = TestRequest::post()
        .uri("/user/contact")
        .insert_header(token_header(BUYER_TOKEN))
        .set_json(json!({ "city": "Москва", "street": "Тверская" }));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Not all required arguments were provided");
}

#[actix_web::test]
async fn update_someone_elses_contact() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_update_contact().withf(|user_id, id, _| *user_id == 1 && *id == 99).returning(|_, _, _| Ok(None));
    let req = TestRequest::put()
        .uri("/user/contact")
        .insert_header(token_header(BUYER_TOKEN))
        .set_json(json!({ "id": "99", "phone": "+7 900 000-00-00" }));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Invalid arguments");
}

#[actix_web::test]
async fn delete_contacts() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts
        .expect_delete_contacts()
        .withf(|user_id, ids| *user_id == 1 && ids.to_vec() == vec![11, 12])
        .times(1)
        .returning(|_, _| Ok(2));
    let req = TestRequest::delete()
        .uri("/user/contact")
        .insert_header(token_header(BUYER_TOKEN))
        .set_json(json!({ "items": "11,abc,12" }));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Status": true, "Deleted": 2 }));
}

#[actix_web::test]
async fn delete_contacts_without_numeric_ids() {
    let _ = env_logger::try_init();
    let mut accounts = MockAccountManager::new();
    accounts.expect_delete_contacts().never();
    let req = TestRequest::delete()
        .uri("/user/contact")
        .insert_header(token_header(BUYER_TOKEN))
        .set_json(json!({ "items": "first,second" }));
    let (status, body) = send(req, configure(accounts)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["Errors"], "Not all required arguments were provided");
}
