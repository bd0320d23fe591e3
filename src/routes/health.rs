use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness check: `{ "status": "ok", "timestamp": ... }`.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

/// Landing route pointing at the API description.
#[get("/")]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to Task Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": super::docs::OPENAPI_PATH
    }))
}
