mod common;

use aims_backend::types::internal::auth::Claims;
use base64::{Engine, engine::general_purpose};
use chrono::Utc;
use common::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use poem::http::{StatusCode, header};
use serde_json::json;

fn token_with(secret: &str, sub: &str, exp: i64) -> String {
    let claims = Claims {
        iss: JWT_ISSUER.to_string(),
        sub: general_purpose::STANDARD.encode(sub.as_bytes()),
        iat: Utc::now().timestamp() - 7200,
        exp,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

#[tokio::test]
async fn test_login_sets_header_and_cookie() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post("/users/login")
        .body_json(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))
        .send()
        .await;

    resp.assert_status(StatusCode::NO_CONTENT);
    let bearer = resp.0.headers().get(header::AUTHORIZATION).unwrap().to_str().unwrap().to_string();
    assert!(bearer.starts_with("Bearer "));

    let cookie = resp.0.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("Authorization="));
    assert!(cookie.contains("HttpOnly"));

    // the issued token opens an authenticated route
    let me = app.get_json("/me", &bearer).await;
    assert_eq!(me["email"], ADMIN_EMAIL);
    assert_eq!(me["admin"], true);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_with_one_message() {
    let app = TestApp::spawn().await;

    let wrong_password = app
        .client
        .post("/users/login")
        .body_json(&json!({"email": USER_EMAIL, "password": "nope"}))
        .send()
        .await;
    let unknown_email = app
        .client
        .post("/users/login")
        .body_json(&json!({"email": "ghost@example.com", "password": USER_PASSWORD}))
        .send()
        .await;

    let first = expect_error(wrong_password, StatusCode::BAD_REQUEST).await;
    let second = expect_error(unknown_email, StatusCode::BAD_REQUEST).await;
    assert_eq!(first, "invalid email or password");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_login_while_authenticated_is_forbidden() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post("/users/login")
        .header(header::AUTHORIZATION, app.user_auth())
        .body_json(&json!({"email": USER_EMAIL, "password": USER_PASSWORD}))
        .send()
        .await;

    assert_eq!(
        expect_error(resp, StatusCode::FORBIDDEN).await,
        "user is already authenticated"
    );
}

#[tokio::test]
async fn test_missing_and_malformed_credentials() {
    let app = TestApp::spawn().await;

    let missing = app.client.get("/me").send().await;
    assert_eq!(
        expect_error(missing, StatusCode::UNAUTHORIZED).await,
        "no jwt auth token specified"
    );

    let scheme = app
        .client
        .get("/me")
        .header(header::AUTHORIZATION, app.user_token.clone())
        .send()
        .await;
    assert_eq!(
        expect_error(scheme, StatusCode::UNAUTHORIZED).await,
        "jwt auth token does not follow the format `Bearer <token>`"
    );

    let garbage = app
        .client
        .get("/me")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .send()
        .await;
    assert_eq!(
        expect_error(garbage, StatusCode::UNAUTHORIZED).await,
        "could not parse jwt auth token"
    );
}

#[tokio::test]
async fn test_token_for_unknown_user() {
    let app = TestApp::spawn().await;
    let token = token_with(JWT_SECRET, &uuid::Uuid::new_v4().to_string(), Utc::now().timestamp() + 600);

    let resp = app
        .client
        .get("/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .send()
        .await;

    assert_eq!(expect_error(resp, StatusCode::UNAUTHORIZED).await, "user not found");
}

#[tokio::test]
async fn test_foreign_signature_rejected() {
    let app = TestApp::spawn().await;
    let token = token_with(
        "a-completely-different-secret-of-32-chars",
        &app.admin.uuid,
        Utc::now().timestamp() + 600,
    );

    let resp = app
        .client
        .get("/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_credential_is_accepted() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get("/me")
        .header(header::COOKIE, format!("Authorization=Bearer {}", app.user_token))
        .send()
        .await;

    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["uuid"], app.user.uuid.as_str());
    assert_eq!(body["teams"][0]["name"], "dev");
}

#[tokio::test]
async fn test_expired_token_never_reaches_the_handler() {
    let app = TestApp::spawn().await;
    let incident = app.create_incident("disk full", &[], &[]).await;

    let expired = token_with(JWT_SECRET, &app.admin.uuid, Utc::now().timestamp() - 60);
    let resp = app
        .client
        .put(format!("/incidents/{}", incident))
        .header(header::AUTHORIZATION, format!("Bearer {}", expired))
        .body_json(&json!({"summary": "changed", "description": "x", "resolved": true}))
        .send()
        .await;

    assert_eq!(
        expect_error(resp, StatusCode::UNAUTHORIZED).await,
        "jwt auth token is no longer valid"
    );

    let current = app.get_json(&format!("/incidents/{}", incident), &app.admin_auth()).await;
    assert_eq!(current["summary"], "disk full");
    assert!(current["resolvedAt"].is_null());
}

#[tokio::test]
async fn test_admin_route_refuses_regular_user_without_side_effects() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post("/teams")
        .header(header::AUTHORIZATION, app.user_auth())
        .body_json(&json!({"name": "intruders"}))
        .send()
        .await;
    assert_eq!(
        expect_error(resp, StatusCode::FORBIDDEN).await,
        "you must be an admin to access this resource"
    );

    let teams = app.get_json("/teams?pageSize=50", &app.user_auth()).await;
    assert_eq!(teams["meta"]["total"], 2);
    let names: Vec<&str> = teams["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"intruders"));
}
