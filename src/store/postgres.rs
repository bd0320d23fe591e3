use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{
    NewUser, Role, Task, TaskDetail, TaskOwner, TaskPatch, TaskStatus, User, UserCredentials,
};

const TASK_COLUMNS: &str =
    "id, title, description, status, created_by, created_at, updated_at";

const TASK_DETAIL_SELECT: &str = "SELECT t.id, t.title, t.description, t.status, t.created_at, t.updated_at, \
     u.id AS owner_id, u.name AS owner_name, u.email AS owner_email, u.role AS owner_role \
     FROM tasks t JOIN users u ON u.id = t.created_by";

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &Config, database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the SQL files under `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct TaskDetailRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_name: String,
    owner_email: String,
    owner_role: Role,
}

impl TaskDetailRow {
    fn into_detail(self, with_role: bool) -> TaskDetail {
        TaskDetail {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            created_by: TaskOwner {
                id: self.owner_id,
                name: self.owner_name,
                email: self.owner_email,
                role: with_role.then_some(self.owner_role),
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let record = user.into_credentials();
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, email, role, created_at",
        )
        .bind(record.user.id)
        .bind(&record.user.name)
        .bind(&record.user.email)
        .bind(&record.password_hash)
        .bind(record.user.role)
        .bind(record.user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, role, created_at, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {TASK_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.created_by)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find_task_detail(&self, id: Uuid) -> Result<Option<TaskDetail>, AppError> {
        let sql = format!("{TASK_DETAIL_SELECT} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TaskDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_detail(false)))
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, AppError> {
        // An empty description clears the column; NULL leaves it alone.
        let sql = format!(
            "UPDATE tasks SET \
                 title = COALESCE($2, title), \
                 description = CASE WHEN $3::text IS NULL THEN description ELSE NULLIF($3, '') END, \
                 status = COALESCE($4, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks_by_owner(&self, owner_id: Uuid) -> Result<Vec<TaskDetail>, AppError> {
        let sql = format!("{TASK_DETAIL_SELECT} WHERE t.created_by = $1 ORDER BY t.created_at DESC");
        let rows = sqlx::query_as::<_, TaskDetailRow>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_detail(false)).collect())
    }

    async fn list_all_tasks(&self) -> Result<Vec<TaskDetail>, AppError> {
        let sql = format!("{TASK_DETAIL_SELECT} ORDER BY t.created_at DESC");
        let rows = sqlx::query_as::<_, TaskDetailRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_detail(true)).collect())
    }
}
