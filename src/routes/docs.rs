use actix_web::{get, HttpResponse, Responder};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AuthPayload, CreateTaskRequest, LoginRequest, RegisterRequest, Role, Task, TaskDetail,
    TaskOwner, TaskStatus, UpdateTaskRequest, User,
};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Management API",
        description = "Register, log in and manage personal tasks. Administrators can read every task."
    ),
    paths(
        super::auth::register,
        super::auth::login,
        super::auth::me,
        super::tasks::create_task,
        super::tasks::get_tasks,
        super::tasks::get_all_tasks,
        super::tasks::get_task,
        super::tasks::update_task,
        super::tasks::delete_task,
    ),
    components(schemas(
        Role,
        User,
        RegisterRequest,
        LoginRequest,
        AuthPayload,
        TaskStatus,
        Task,
        TaskOwner,
        TaskDetail,
        CreateTaskRequest,
        UpdateTaskRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Tasks", description = "Task management"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
