#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use taskdesk::config::Config;
use taskdesk::configure_app;
use taskdesk::state::AppState;
use taskdesk::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh state on an empty in-memory store, with the cheapest bcrypt cost.
pub fn test_state() -> web::Data<AppState> {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.into()),
        "BCRYPT_COST" => Some("4".into()),
        _ => None,
    })
    .expect("test configuration is valid");
    web::Data::new(AppState::new(config, Arc::new(MemoryStore::new())))
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(App::new().app_data(state).configure(configure_app)).await
}

/// Sends a request and returns the status and the JSON body.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        panic!(
            "Response is not JSON. Status: {}. Body: {:?}",
            status,
            String::from_utf8_lossy(&bytes)
        )
    });
    (status, body)
}

pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub async fn register_user(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": password,
            "role": role
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed: {}", body);

    TestUser {
        id: body["data"]["_id"].as_str().unwrap().to_string(),
        token: body["data"]["token"].as_str().unwrap().to_string(),
    }
}

pub async fn create_task(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    user: &TestUser,
    payload: Value,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(user.bearer())
        .set_json(payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Task creation failed: {}", body);
    body["data"].clone()
}
