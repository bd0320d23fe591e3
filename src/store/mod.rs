//! Persistence for users and tasks.
//!
//! The services only see the `UserStore` and `TaskStore` traits. `PgStore` is the
//! production backend; `MemoryStore` backs tests and database-less local runs.
//! Every method is a single round trip with per-record atomicity; no call spans a
//! transaction.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskDetail, TaskPatch, User, UserCredentials};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. Fails with `AppError::Conflict` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Loads a user together with the password hash, for login only.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError>;
}

/// Task store. Listings are newest-first and carry the owner joined in.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: Task) -> Result<Task, AppError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// The task with owner `{_id, name, email}` attached.
    async fn find_task_detail(&self, id: Uuid) -> Result<Option<TaskDetail>, AppError>;

    /// Applies a validated patch. `None` if the task no longer exists.
    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, AppError>;

    /// `false` if there was nothing to delete.
    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;

    async fn list_tasks_by_owner(&self, owner_id: Uuid) -> Result<Vec<TaskDetail>, AppError>;

    /// Every task, owner attached including the owner's role.
    async fn list_all_tasks(&self) -> Result<Vec<TaskDetail>, AppError>;
}

pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}
