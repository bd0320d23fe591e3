mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use taskdesk::auth::TokenIssuer;
use uuid::Uuid;

use common::{create_task, init_app, register_user, send, test_state, TEST_SECRET};

#[test_log::test(actix_rt::test)]
async fn test_register_login_and_task_lifecycle() {
    let app = init_app(test_state()).await;

    let alice = register_user(&app, "Alice", "a@x.com", "pw123", "user").await;
    assert!(!alice.token.is_empty());

    // Wrong password
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "wrong" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    // Correct password
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "pw123" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["_id"], alice.id.as_str());
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"]["token"].is_string());

    let task = create_task(&app, &alice, json!({ "title": "Buy milk" })).await;
    assert_eq!(task["status"], "pending");
    assert_eq!(task["createdBy"], alice.id.as_str());
    assert!(task.get("description").is_none());
    let task_id = task["_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(alice.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "Buy milk");
    assert_eq!(body["data"][0]["createdBy"]["name"], "Alice");
    assert_eq!(body["data"][0]["createdBy"]["email"], "a@x.com");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .insert_header(alice.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["title"], "Buy milk");

    let bob = register_user(&app, "Bob", "b@x.com", "pw456", "user").await;
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .insert_header(bob.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to delete this task");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .insert_header(alice.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": {} }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .insert_header(alice.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Task not found" }));
}

#[actix_rt::test]
async fn test_duplicate_email_is_rejected() {
    let app = init_app(test_state()).await;
    register_user(&app, "Alice", "a@x.com", "pw123", "user").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "name": "Other", "email": "  A@X.com ", "password": "pw" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    // The first account still logs in.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "pw123" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_register_requires_all_fields() {
    let app = init_app(test_state()).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": "a@x.com", "password": "pw123" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide all required fields");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "name": "Alice", "email": "not-an-email", "password": "pw123" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a valid email");
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let app = init_app(test_state()).await;
    register_user(&app, "Alice", "a@x.com", "pw123", "user").await;

    let wrong_password = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "a@x.com", "password": "nope" }))
        .to_request();
    let unknown_email = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "ghost@x.com", "password": "nope" }))
        .to_request();

    let first = send(&app, wrong_password).await;
    let second = send(&app, unknown_email).await;
    assert_eq!(first.0, StatusCode::UNAUTHORIZED);
    assert_eq!(first, second);

    let missing = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "a@x.com" }))
        .to_request();
    let (status, body) = send(&app, missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide email and password");
}

#[actix_rt::test]
async fn test_me_returns_caller() {
    let app = init_app(test_state()).await;
    let alice = register_user(&app, "Alice", "a@x.com", "pw123", "user").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(alice.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["_id"], alice.id.as_str());
    assert_eq!(body["data"]["email"], "a@x.com");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("passwordHash").is_none());
}

#[actix_rt::test]
async fn test_tasks_are_private_to_their_owner() {
    let app = init_app(test_state()).await;
    let alice = register_user(&app, "Alice", "a@x.com", "pw123", "user").await;
    let bob = register_user(&app, "Bob", "b@x.com", "pw456", "user").await;
    let task = create_task(&app, &alice, json!({ "title": "Secret plan" })).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(bob.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks/{}", task["_id"].as_str().unwrap()))
        .insert_header(bob.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to access this task");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/{}", task["_id"].as_str().unwrap()))
        .insert_header(bob.bearer())
        .set_json(json!({ "title": "Mine now" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_admin_reads_but_cannot_modify() {
    let app = init_app(test_state()).await;
    let alice = register_user(&app, "Alice", "a@x.com", "pw123", "user").await;
    let root = register_user(&app, "Root", "root@x.com", "rootpw", "admin").await;
    let task = create_task(&app, &alice, json!({ "title": "Quarterly report" })).await;
    let task_uri = format!("/api/v1/tasks/{}", task["_id"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri(&task_uri)
        .insert_header(root.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["createdBy"]["_id"], alice.id.as_str());

    let req = test::TestRequest::put()
        .uri(&task_uri)
        .insert_header(root.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to update this task");

    let req = test::TestRequest::delete()
        .uri(&task_uri)
        .insert_header(root.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_admin_listing_is_role_gated() {
    let app = init_app(test_state()).await;
    let alice = register_user(&app, "Alice", "a@x.com", "pw123", "user").await;
    let bob = register_user(&app, "Bob", "b@x.com", "pw456", "user").await;
    let root = register_user(&app, "Root", "root@x.com", "rootpw", "admin").await;
    create_task(&app, &alice, json!({ "title": "first" })).await;
    create_task(&app, &bob, json!({ "title": "second" })).await;
    create_task(&app, &alice, json!({ "title": "third" })).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks/admin/all")
        .insert_header(alice.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "User role 'user' is not authorized to access this route"
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks/admin/all")
        .insert_header(root.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert_eq!(body["data"][1]["createdBy"]["role"], "user");

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(alice.bearer())
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"][0]["title"], "third");
    assert_eq!(body["data"][1]["title"], "first");
}

#[actix_rt::test]
async fn test_token_checks() {
    let app = init_app(test_state()).await;

    let req = test::TestRequest::get().uri("/api/v1/tasks").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Not authorized to access this route" })
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Signed with the right secret, but nobody by that id is registered.
    let issuer = TokenIssuer::new(TEST_SECRET, Duration::hours(1));
    let orphan = issuer.issue(Uuid::new_v4()).unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", orphan)))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let expired = TokenIssuer::new(TEST_SECRET, Duration::hours(-2))
        .issue(Uuid::new_v4())
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/tasks")
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_malformed_input() {
    let app = init_app(test_state()).await;
    let alice = register_user(&app, "Alice", "a@x.com", "pw123", "user").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/tasks/not-a-uuid")
        .insert_header(alice.bearer())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found");

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(alice.bearer())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(alice.bearer())
        .set_json(json!({ "title": "   " }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please provide a task title");

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .insert_header(alice.bearer())
        .set_json(json!({ "title": "x".repeat(101) }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_public_routes() {
    let app = init_app(test_state()).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Task Management API");

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri("/api-docs/openapi.json").to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/tasks/{id}"].is_object());

    let (status, body) = send(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Route not found" }));
}
