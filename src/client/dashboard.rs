use std::fmt;

use uuid::Uuid;

use super::{ApiClient, ClientError, SessionUser};
use crate::models::{CreateTaskRequest, TaskDetail, TaskStatus, UpdateTaskRequest};

/// One-shot message shown above the task list after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// View state of the task screen.
///
/// Every mutation is followed by a full re-fetch of the caller's tasks; nothing
/// is changed locally. Rejections from the server become an error flash, while
/// a lost session is returned to the caller so it can send the user to login.
pub struct Dashboard {
    client: ApiClient,
    pub user: SessionUser,
    pub tasks: Vec<TaskDetail>,
    pub flash: Option<Flash>,
    pub editing: Option<Uuid>,
}

impl Dashboard {
    /// Opens the dashboard for the stored session and loads the task list.
    pub async fn open(client: ApiClient) -> Result<Self, ClientError> {
        let session = client.session()?.ok_or(ClientError::NotLoggedIn)?;
        let mut dashboard = Self {
            client,
            user: session.user,
            tasks: Vec::new(),
            flash: None,
            editing: None,
        };
        dashboard.refresh().await?;
        Ok(dashboard)
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.tasks = self.client.list_tasks().await?;
        Ok(())
    }

    pub fn task(&self, id: Uuid) -> Option<&TaskDetail> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub async fn add(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<(), ClientError> {
        let request = CreateTaskRequest {
            title: Some(title.into()),
            description: description.map(str::to_string),
            status: None,
        };
        let result = self.client.create_task(&request).await;
        self.settle(result, "Task created").await
    }

    /// Marks a task as being edited; `save_edit` applies the changes to it.
    pub fn start_edit(&mut self, id: Uuid) {
        self.editing = Some(id);
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn save_edit(&mut self, patch: UpdateTaskRequest) -> Result<(), ClientError> {
        let Some(id) = self.editing else {
            self.flash = Some(Flash::Error("No task is being edited".into()));
            return Ok(());
        };
        let result = self.client.update_task(id, &patch).await;
        if result.is_ok() {
            self.editing = None;
        }
        self.settle(result, "Task updated").await
    }

    pub async fn set_status(&mut self, id: Uuid, status: TaskStatus) -> Result<(), ClientError> {
        let patch = UpdateTaskRequest {
            status: Some(status),
            ..Default::default()
        };
        let result = self.client.update_task(id, &patch).await;
        self.settle(result, &format!("Task marked {}", status_label(status)))
            .await
    }

    /// Flips a task between pending and completed.
    pub async fn toggle(&mut self, id: Uuid) -> Result<(), ClientError> {
        match self.task(id).map(|task| task.status) {
            Some(status) => self.set_status(id, status.toggled()).await,
            None => {
                self.flash = Some(Flash::Error("Task not found".into()));
                Ok(())
            }
        }
    }

    pub async fn remove(&mut self, id: Uuid) -> Result<(), ClientError> {
        let result = self.client.delete_task(id).await;
        if result.is_ok() && self.editing == Some(id) {
            self.editing = None;
        }
        self.settle(result, "Task deleted").await
    }

    async fn settle<T>(
        &mut self,
        result: Result<T, ClientError>,
        success: &str,
    ) -> Result<(), ClientError> {
        match result {
            Ok(_) => self.flash = Some(Flash::Success(success.to_string())),
            Err(ClientError::Api { message, .. }) => self.flash = Some(Flash::Error(message)),
            Err(err) => return Err(err),
        }
        self.refresh().await
    }
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Completed => "completed",
    }
}

/// One line per task: checkbox, id, title and description.
pub fn task_line(task: &TaskDetail) -> String {
    let mark = match task.status {
        TaskStatus::Completed => "[x]",
        TaskStatus::Pending => "[ ]",
    };
    match &task.description {
        Some(description) => format!("{} {} {} - {}", mark, task.id, task.title, description),
        None => format!("{} {} {}", mark, task.id, task.title),
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.flash {
            Some(Flash::Success(message)) => writeln!(f, "{}", message)?,
            Some(Flash::Error(message)) => writeln!(f, "error: {}", message)?,
            None => {}
        }
        writeln!(f, "Tasks of {} <{}>", self.user.name, self.user.email)?;
        if self.tasks.is_empty() {
            return writeln!(f, "  No tasks yet.");
        }
        for task in &self.tasks {
            writeln!(f, "  {}", task_line(task))?;
        }
        Ok(())
    }
}

/// True for a "y" or "yes" answer to a prompt, in any case.
pub fn confirms(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
