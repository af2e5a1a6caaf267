#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

use common::{bearer, find_profile, promote_to_staff, registration, test_state, PASSWORD};

async fn read_json(resp: actix_web::dev::ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_health_and_home() {
    let (state, _) = test_state().await;
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/home").to_request()).await;
    let body = read_json(resp).await;
    assert_eq!(body["message"], "Hello AG!");
}

#[actix_web::test]
async fn test_register_login_and_profile() {
    let (state, mailer) = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["email_sent"], true);
    assert_eq!(mailer.sent_to("alice@example.com").len(), 1);

    // Doublon
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("alice"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Connexion par email
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": "alice@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    let access = body["data"]["tokens"]["access"].as_str().unwrap().to_string();
    let refresh = body["data"]["tokens"]["refresh"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["balance"], "0.00");
    assert_eq!(body["data"]["ADA"], "0.00");
    assert_eq!(body["data"]["has_transaction_pin"], false);

    // Le refresh token n'ouvre pas les routes protégées
    let req = test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(bearer(&refresh))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/token/refresh")
        .set_json(json!({ "refresh": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert!(body["access"].is_string());

    let req = test::TestRequest::get().uri("/api/auth/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(resp).await;
    assert_eq!(body["status"], "error");
}

macro_rules! login {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "login": $username, "password": PASSWORD }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["data"]["tokens"]["access"].as_str().unwrap().to_string()
    }};
}

macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(registration($username))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }};
}

#[actix_web::test]
async fn test_deposit_is_credited_once() {
    let (state, mailer) = test_state().await;
    let app = test_app!(state);

    register!(app, "bob");
    register!(app, "admin");
    promote_to_staff(&state.db, "admin").await;
    let user_token = login!(app, "bob");
    let admin_token = login!(app, "admin");

    let req = test::TestRequest::post()
        .uri("/api/auth/deposits/create")
        .insert_header(bearer(&user_token))
        .set_json(json!({
            "amount": "150.50",
            "payment_type": "BTC",
            "deposit_type": "fund",
            "proof_of_payment": "proofs/bob-1.png",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    let deposit_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "pending");

    // Un utilisateur non staff ne peut pas valider
    let uri = format!("/api/admin/deposits/{}/status", deposit_id);
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&user_token))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    for expected_credit in [true, false] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(&admin_token))
            .set_json(json!({ "status": "completed", "transaction_id": "btc-tx-1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["credited"], expected_credit);
    }

    let profile = find_profile(&state.db, "bob").await;
    assert_eq!(profile.balance, Decimal::from_str("150.50").unwrap());

    let req = test::TestRequest::get()
        .uri("/api/auth/recent-activity")
        .insert_header(bearer(&user_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["amount"], "$150.50");
    assert_eq!(items[0]["status"], "completed");

    let confirmations = mailer
        .sent_to("bob@example.com")
        .into_iter()
        .filter(|m| m.subject.starts_with("Deposit Confirmation"))
        .count();
    assert_eq!(confirmations, 1);

    // completed -> failed interdit
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "status": "failed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[actix_web::test]
async fn test_withdrawal_with_pin_and_rejection() {
    let (state, mailer) = test_state().await;
    let app = test_app!(state);

    register!(app, "carol");
    register!(app, "admin");
    promote_to_staff(&state.db, "admin").await;
    let token = login!(app, "carol");
    let admin_token = login!(app, "admin");
    let carol_id = common::find_user(&state.db, "carol").await.id;

    let withdrawal = json!({
        "amount": "200",
        "payment_method": "USDT",
        "wallet_address": "TXYZ123",
        "transaction_pin": "123456",
    });

    // Pas encore de PIN
    let req = test::TestRequest::post()
        .uri("/api/auth/withdrawals/create")
        .insert_header(bearer(&token))
        .set_json(&withdrawal)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = read_json(resp).await;
    assert_eq!(body["code"], "PIN_REQUIRED");

    // OTP -> PIN
    let req = test::TestRequest::post()
        .uri("/api/auth/transaction-pin/request-otp")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let otp = find_profile(&state.db, "carol").await.pin_otp.unwrap();
    assert!(mailer.sent_to("carol@example.com").iter().any(|m| m.body.contains(&otp)));

    let req = test::TestRequest::post()
        .uri("/api/auth/transaction-pin/set")
        .insert_header(bearer(&token))
        .set_json(json!({ "otp": otp, "pin": "123456", "confirm_pin": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Solde disponible insuffisant
    let req = test::TestRequest::post()
        .uri("/api/auth/withdrawals/create")
        .insert_header(bearer(&token))
        .set_json(&withdrawal)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");

    let req = test::TestRequest::post()
        .uri("/api/admin/ledger/adjustments")
        .insert_header(bearer(&admin_token))
        .set_json(json!({
            "user_id": carol_id,
            "field": "avail_balance",
            "direction": "credit",
            "amount": "500",
            "description": "Opening balance",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/withdrawals/create")
        .insert_header(bearer(&token))
        .set_json(&withdrawal)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["profile"]["avail_balance"], "300.00");
    let withdrawal_id = body["data"]["withdrawal"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/withdrawals/{}/status", withdrawal_id))
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "status": "rejected", "notes": "Address mismatch" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["refunded"], true);
    assert_eq!(body["data"]["withdrawal"]["status"], "rejected");

    let profile = find_profile(&state.db, "carol").await;
    assert_eq!(profile.avail_balance, Decimal::from(500));

    // adjustment + withdrawal + refund
    let req = test::TestRequest::get()
        .uri("/api/auth/transactions?page=1&page_size=10")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["total_pages"], 1);

    let req = test::TestRequest::get()
        .uri("/api/auth/withdrawals")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_admin_wallets_and_public_listing() {
    let (state, _) = test_state().await;
    let app = test_app!(state);

    register!(app, "dan");
    register!(app, "admin");
    promote_to_staff(&state.db, "admin").await;
    let token = login!(app, "dan");
    let admin_token = login!(app, "admin");

    let req = test::TestRequest::post()
        .uri("/api/admin/wallets")
        .insert_header(bearer(&admin_token))
        .set_json(json!({
            "cryptocurrency": "USDT",
            "network": "TRC20",
            "address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
            "is_default": true,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    let wallet_id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/wallets")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/wallets/{}/status", wallet_id))
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "status": "maintenance" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/auth/wallets")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_contact_form() {
    let (state, mailer) = test_state().await;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "first_name": "Jean",
            "last_name": "Dupont",
            "email_address": "jean@example.com",
            "phone": "+1 555 123 4567",
            "message": "Hello",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    assert!(body["data"]["submission_id"].is_number());
    assert_eq!(mailer.sent_to("contact@test.local").len(), 1);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "first_name": "Jean",
            "last_name": "Dupont",
            "email_address": "jean@example.com",
            "phone": "555",
            "message": "Hello",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    assert!(body["errors"]["phone"].is_array());
}
