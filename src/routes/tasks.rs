use crate::{
    auth::{require_role, CurrentUser},
    error::AppError,
    models::{CreateTaskRequest, Role, UpdateTaskRequest},
    response::ApiResponse,
    services,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, at most 100 characters.
/// - `description` (optional): at most 500 characters.
/// - `status` (optional): `pending` or `completed`. Defaults to `pending`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, `createdBy` holding the owner's id.
/// - `400 Bad Request`: title missing or a field out of bounds.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = crate::models::Task),
        (status = 400, description = "Missing title or invalid field"),
        (status = 401, description = "Missing or invalid token"),
    )
)]
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task =
        services::tasks::create(&*state.store, &user.requester(), task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(task)))
}

/// Retrieves the authenticated user's tasks, newest first.
///
/// Each task carries its owner's `name` and `email` under `createdBy`.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller's tasks", body = [crate::models::TaskDetail]),
        (status = 401, description = "Missing or invalid token"),
    )
)]
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = services::tasks::list_mine(&*state.store, &user.requester()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(tasks)))
}

/// Retrieves every task in the system. Administrators only.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/admin/all",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All tasks, owner role included", body = [crate::models::TaskDetail]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an administrator"),
    )
)]
#[get("/admin/all")]
pub async fn get_all_tasks(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    require_role(&user.0, &[Role::Admin])?;

    let tasks = services::tasks::list_all(&*state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(tasks)))
}

/// Retrieves a specific task by its ID.
///
/// The caller must own the task or be an administrator.
///
/// ## Responses:
/// - `200 OK`: the task with its owner attached.
/// - `403 Forbidden`: the caller is neither the owner nor an administrator.
/// - `404 Not Found`: no task with that id.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "The task", body = crate::models::TaskDetail),
        (status = 403, description = "Not the owner or an administrator"),
        (status = 404, description = "Task not found"),
    )
)]
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task =
        services::tasks::get_one(&*state.store, task_id.into_inner(), &user.requester()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(task)))
}

/// Updates an existing task. Owner only; administrators get 403 as well.
///
/// Absent fields are left unchanged; an empty `description` clears it.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "The updated task", body = crate::models::Task),
        (status = 400, description = "Invalid field"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Task not found"),
    )
)]
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = services::tasks::update(
        &*state.store,
        task_id.into_inner(),
        &user.requester(),
        task_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(task)))
}

/// Deletes a task by its ID. Owner only.
///
/// Responds `200 OK` with an empty `data` object.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Task not found"),
    )
)]
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    services::tasks::delete(&*state.store, task_id.into_inner(), &user.requester()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(json!({}))))
}
