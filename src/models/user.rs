use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Role of a user account.
/// Corresponds to the `user_role` SQL enum.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as returned by the API. The password hash is not part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A stored user together with its password hash.
/// Only loaded when credentials have to be compared.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// A user about to be persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    pub fn into_credentials(self) -> UserCredentials {
        UserCredentials {
            user: User {
                id: Uuid::new_v4(),
                name: self.name,
                email: self.email,
                role: self.role,
                created_at: Utc::now(),
            },
            password_hash: self.password_hash,
        }
    }
}

/// Payload of `POST /auth/register`. Fields are optional so that a missing one is
/// reported with a domain message instead of a deserialization error.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Payload of `POST /auth/login`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A registration whose required fields are all present, ready for validation.
#[derive(Debug, Validate)]
pub struct Registration {
    /// Between 1 and 50 characters once trimmed.
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(max = 128, message = "Password cannot be more than 128 characters"))]
    pub password: String,
    pub role: Role,
}

impl Registration {
    /// Returns `None` when a required field is missing or blank.
    pub fn from_request(request: RegisterRequest) -> Option<Self> {
        let name = non_blank(request.name)?;
        let email = non_blank(request.email)?;
        let password = request.password.filter(|p| !p.is_empty())?;
        Some(Self {
            name,
            email: normalize_email(&email),
            password,
            role: request.role.unwrap_or_default(),
        })
    }
}

/// Response body of register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Bearer token for subsequent requests.
    pub token: String,
}

impl AuthPayload {
    pub fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
