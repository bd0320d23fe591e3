//! Task service. Every operation takes the `Requester` explicitly and decides access
//! from it; nothing is read from ambient request state.

use uuid::Uuid;
use validator::Validate;

use crate::auth::Requester;
use crate::error::AppError;
use crate::models::{
    CreateTaskRequest, NewTask, Task, TaskDetail, TaskPatch, UpdateTaskRequest,
};
use crate::store::TaskStore;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Creates a task owned by the requester. Status defaults to `pending`.
pub async fn create<S: TaskStore + ?Sized>(
    tasks: &S,
    owner: &Requester,
    request: CreateTaskRequest,
) -> Result<Task, AppError> {
    let input = NewTask::from_request(request)
        .ok_or_else(|| AppError::BadRequest("Please provide a task title".into()))?;
    input.validate()?;

    tasks.insert_task(Task::new(input, owner.id)).await
}

/// The requester's own tasks, newest first, owner attached.
pub async fn list_mine<S: TaskStore + ?Sized>(
    tasks: &S,
    requester: &Requester,
) -> Result<Vec<TaskDetail>, AppError> {
    tasks.list_tasks_by_owner(requester.id).await
}

/// One task, visible to its owner and to administrators.
pub async fn get_one<S: TaskStore + ?Sized>(
    tasks: &S,
    task_id: Uuid,
    requester: &Requester,
) -> Result<TaskDetail, AppError> {
    let task = tasks.find_task(task_id).await?.ok_or_else(task_not_found)?;
    if !requester.can_read(&task) {
        log::warn!("User {} denied read access to task {}", requester.id, task_id);
        return Err(AppError::Forbidden(
            "Not authorized to access this task".into(),
        ));
    }

    tasks
        .find_task_detail(task_id)
        .await?
        .ok_or_else(task_not_found)
}

/// Partial update, owner only. Administrators are not exempt.
pub async fn update<S: TaskStore + ?Sized>(
    tasks: &S,
    task_id: Uuid,
    requester: &Requester,
    request: UpdateTaskRequest,
) -> Result<Task, AppError> {
    let task = tasks.find_task(task_id).await?.ok_or_else(task_not_found)?;
    if !requester.can_modify(&task) {
        log::warn!("User {} denied update of task {}", requester.id, task_id);
        return Err(AppError::Forbidden(
            "Not authorized to update this task".into(),
        ));
    }

    let patch = TaskPatch::from(request);
    patch.validate()?;

    tasks
        .update_task(task_id, &patch)
        .await?
        .ok_or_else(task_not_found)
}

/// Removes a task, owner only. Administrators are not exempt.
pub async fn delete<S: TaskStore + ?Sized>(
    tasks: &S,
    task_id: Uuid,
    requester: &Requester,
) -> Result<(), AppError> {
    let task = tasks.find_task(task_id).await?.ok_or_else(task_not_found)?;
    if !requester.can_modify(&task) {
        log::warn!("User {} denied delete of task {}", requester.id, task_id);
        return Err(AppError::Forbidden(
            "Not authorized to delete this task".into(),
        ));
    }

    if !tasks.delete_task(task_id).await? {
        return Err(task_not_found());
    }
    Ok(())
}

/// Every task in the system, newest first, owner (with role) attached.
///
/// Performs no role check of its own; the route restricts it to administrators.
pub async fn list_all<S: TaskStore + ?Sized>(tasks: &S) -> Result<Vec<TaskDetail>, AppError> {
    tasks.list_all_tasks().await
}
