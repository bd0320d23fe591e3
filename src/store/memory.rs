use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskDetail, TaskOwner, TaskPatch, User, UserCredentials};

/// In-process store with the same contract as `PgStore`.
///
/// Records are kept in insertion order; listings sort by `created_at` descending and
/// fall back to reverse insertion order for equal timestamps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<UserCredentials>,
    tasks: Vec<Task>,
}

impl Inner {
    fn owner_of(&self, task: &Task, with_role: bool) -> Option<TaskOwner> {
        self.users
            .iter()
            .find(|c| c.user.id == task.created_by)
            .map(|c| TaskOwner {
                id: c.user.id,
                name: c.user.name.clone(),
                email: c.user.email.clone(),
                role: with_role.then_some(c.user.role),
            })
    }

    fn newest_first<'a, I>(&self, tasks: I, with_role: bool) -> Vec<TaskDetail>
    where
        I: DoubleEndedIterator<Item = &'a Task>,
    {
        let mut details: Vec<TaskDetail> = tasks
            .rev()
            .filter_map(|task| {
                self.owner_of(task, with_role)
                    .map(|owner| task.clone().with_owner(owner))
            })
            .collect();
        details.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        details
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, AppError> {
        self.inner
            .read()
            .map_err(|_| AppError::InternalServerError("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, AppError> {
        self.inner
            .write()
            .map_err(|_| AppError::InternalServerError("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut inner = self.write()?;
        if inner.users.iter().any(|c| c.user.email == user.email) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        let credentials = user.into_credentials();
        let created = credentials.user.clone();
        inner.users.push(credentials);
        Ok(created)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        let mut inner = self.write()?;
        if !inner.users.iter().any(|c| c.user.id == task.created_by) {
            return Err(AppError::DatabaseError(format!(
                "task owner {} does not exist",
                task.created_by
            )));
        }
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.read()?.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn find_task_detail(&self, id: Uuid) -> Result<Option<TaskDetail>, AppError> {
        let inner = self.read()?;
        Ok(inner.tasks.iter().find(|t| t.id == id).and_then(|task| {
            inner
                .owner_of(task, false)
                .map(|owner| task.clone().with_owner(owner))
        }))
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Option<Task>, AppError> {
        let mut inner = self.write()?;
        Ok(inner.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.apply(patch);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.write()?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        Ok(inner.tasks.len() != before)
    }

    async fn list_tasks_by_owner(&self, owner_id: Uuid) -> Result<Vec<TaskDetail>, AppError> {
        let inner = self.read()?;
        let owned: Vec<&Task> = inner
            .tasks
            .iter()
            .filter(|t| t.created_by == owner_id)
            .collect();
        Ok(inner.newest_first(owned.into_iter(), false))
    }

    async fn list_all_tasks(&self) -> Result<Vec<TaskDetail>, AppError> {
        let inner = self.read()?;
        Ok(inner.newest_first(inner.tasks.iter(), true))
    }
}
