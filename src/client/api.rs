use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::{ClientError, Session, SessionStore};
use crate::models::{
    AuthPayload, CreateTaskRequest, LoginRequest, RegisterRequest, Role, Task, TaskDetail,
    UpdateTaskRequest, User,
};
use crate::response::ApiResponse;

const API_PREFIX: &str = "/api/v1";

/// Token-attaching wrapper around the task API.
///
/// Login and registration store the returned session; every other call reads
/// the token from the `SessionStore`. A 401 on an authenticated call clears the
/// stored session and yields `ClientError::SessionExpired`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        }
    }

    /// The stored session, if any.
    pub fn session(&self) -> Result<Option<Session>, ClientError> {
        self.session.load()
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Session, ClientError> {
        let body = RegisterRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            role,
        };
        self.start_session("/auth/register", &body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        };
        self.start_session("/auth/login", &body).await
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        let request = self.authed(Method::GET, "/auth/me")?;
        self.send(request, true).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskDetail>, ClientError> {
        let request = self.authed(Method::GET, "/tasks")?;
        self.send(request, true).await
    }

    pub async fn list_all_tasks(&self) -> Result<Vec<TaskDetail>, ClientError> {
        let request = self.authed(Method::GET, "/tasks/admin/all")?;
        self.send(request, true).await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<TaskDetail, ClientError> {
        let request = self.authed(Method::GET, &format!("/tasks/{}", id))?;
        self.send(request, true).await
    }

    pub async fn create_task(&self, task: &CreateTaskRequest) -> Result<Task, ClientError> {
        let request = self.authed(Method::POST, "/tasks")?.json(task);
        self.send(request, true).await
    }

    pub async fn update_task(
        &self,
        id: Uuid,
        patch: &UpdateTaskRequest,
    ) -> Result<Task, ClientError> {
        let request = self
            .authed(Method::PUT, &format!("/tasks/{}", id))?
            .json(patch);
        self.send(request, true).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self.authed(Method::DELETE, &format!("/tasks/{}", id))?;
        let _: serde_json::Value = self.send(request, true).await?;
        Ok(())
    }

    async fn start_session<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Session, ClientError> {
        let request = self.http.post(self.url(path)).json(body);
        let payload: AuthPayload = self.send(request, false).await?;
        let session = Session::from(payload);
        self.session.save(&session)?;
        Ok(session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let session = self.session.load()?.ok_or(ClientError::NotLoggedIn)?;
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(session.token))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        authenticated: bool,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED && authenticated {
            log::info!("Token rejected, clearing session");
            self.session.clear()?;
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unexpected response")
                        .to_string()
                });
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
        envelope.data.ok_or_else(|| ClientError::Api {
            status: status.as_u16(),
            message: "Response carried no data".into(),
        })
    }
}
