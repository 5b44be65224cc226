// Shared fixtures for the HTTP-level tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use aims_backend::AppData;
use aims_backend::api;
use aims_backend::config::{EnvironmentProvider, connect, migrate_database};
use aims_backend::stores::user_store::NewUser;
use aims_backend::types::db::{team, user};
use poem::endpoint::BoxEndpoint;
use poem::http::{StatusCode, header};
use poem::test::{TestClient, TestResponse};
use poem::EndpointExt;
use serde_json::{Value, json};

pub const JWT_SECRET: &str = "integration-secret-key-at-least-32-chars";
pub const JWT_ISSUER: &str = "AIMS";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "user-password";

/// Fixed environment so tests never read the real one
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let vars = [
            ("JWT_SECRET", JWT_SECRET),
            ("PASSWORD_PEPPER", "integration-pepper-value"),
            ("JWT_ISSUER", JWT_ISSUER),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { vars }
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// In-memory app with an admin in team `ops` and a regular user in team `dev`
pub struct TestApp {
    pub client: TestClient<BoxEndpoint<'static>>,
    pub data: Arc<AppData>,
    pub admin: user::Model,
    pub user: user::Model,
    pub ops: team::Model,
    pub dev: team::Model,
    pub admin_token: String,
    pub user_token: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = connect("sqlite::memory:").await.unwrap();
        migrate_database(&db).await.unwrap();
        let data = Arc::new(AppData::init_with(db, Arc::new(TestEnvironment::new())).unwrap());

        let ops = data.team_store.create(&data.db, "ops").await.unwrap();
        let dev = data.team_store.create(&data.db, "dev").await.unwrap();

        let admin = seed_user(&data, "Admin", ADMIN_EMAIL, ADMIN_PASSWORD, true, ops.id).await;
        let user = seed_user(&data, "User", USER_EMAIL, USER_PASSWORD, false, dev.id).await;

        let admin_token = data.authentication_provider.issue_token(&admin).unwrap();
        let user_token = data.authentication_provider.issue_token(&user).unwrap();

        let client = TestClient::new(api::routes(data.clone()).map_to_response().boxed());

        Self {
            client,
            data,
            admin,
            user,
            ops,
            dev,
            admin_token,
            user_token,
        }
    }

    pub fn admin_auth(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    pub fn user_auth(&self) -> String {
        format!("Bearer {}", self.user_token)
    }

    /// POST as admin, expect 201, return the uuid from `Location`
    pub async fn create_as_admin(&self, path: &str, body: &Value) -> String {
        let resp = self
            .client
            .post(path)
            .header(header::AUTHORIZATION, self.admin_auth())
            .body_json(body)
            .send()
            .await;
        resp.assert_status(StatusCode::CREATED);
        location_uuid(&resp)
    }

    pub async fn create_host(&self, hostname: &str, team_uuid: &str) -> String {
        let body = json!({
            "hostname": hostname,
            "os": "Linux",
            "ip4": "10.0.0.1",
            "teamID": team_uuid,
        });
        self.create_as_admin("/hosts", &body).await
    }

    pub async fn create_incident(&self, summary: &str, hosts: &[&str], teams: &[&str]) -> String {
        let body = json!({
            "summary": summary,
            "description": "details",
            "hostsAffected": hosts,
            "resolutionTeams": teams,
        });
        self.create_as_admin("/incidents", &body).await
    }

    /// GET with the given `Authorization` value, expect 200, return the body
    pub async fn get_json(&self, path: &str, auth: &str) -> Value {
        let resp = self.client.get(path).header(header::AUTHORIZATION, auth).send().await;
        resp.assert_status_is_ok();
        body_json(resp).await
    }
}

async fn seed_user(data: &AppData, name: &str, email: &str, password: &str, admin: bool, team_id: i32) -> user::Model {
    let hash = data.crypto_provider.hash_password(password).await.unwrap();
    let user = data
        .user_store
        .create(&data.db, NewUser::new(name, email, &hash).admin(admin))
        .await
        .unwrap();
    data.user_store.replace_teams(&data.db, user.id, &[team_id]).await.unwrap();
    user
}

pub async fn body_json(resp: TestResponse) -> Value {
    resp.0.into_body().into_json().await.unwrap()
}

/// Expect `status` and return the `error` message of the body
pub async fn expect_error(resp: TestResponse, status: StatusCode) -> String {
    resp.assert_status(status);
    let body = body_json(resp).await;
    body["error"].as_str().unwrap().to_string()
}

/// Last path segment of the `Location` header
pub fn location_uuid(resp: &TestResponse) -> String {
    let location = resp.0.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    location.rsplit('/').next().unwrap().to_string()
}
