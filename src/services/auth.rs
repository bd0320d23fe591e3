//! Credential service: registration, login and the caller's own record.

use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password_async, verify_password_async};
use crate::auth::TokenIssuer;
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{AuthPayload, LoginRequest, NewUser, RegisterRequest, Registration, User};
use crate::store::UserStore;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Creates an account and returns it with a fresh token.
///
/// Fails with `BadRequest` if a required field is missing or invalid, and with
/// `Conflict` (HTTP 400) if the email is already registered. The role defaults to
/// `user`.
pub async fn register<S: UserStore + ?Sized>(
    users: &S,
    tokens: &TokenIssuer,
    bcrypt_cost: u32,
    request: RegisterRequest,
) -> Result<AuthPayload, AppError> {
    let registration = Registration::from_request(request)
        .ok_or_else(|| AppError::BadRequest("Please provide all required fields".into()))?;
    registration.validate()?;

    if users
        .find_credentials_by_email(&registration.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password_async(registration.password, bcrypt_cost).await?;
    // The unique index still guards the window between the check above and this insert.
    let user = users
        .insert_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
            role: registration.role,
        })
        .await?;

    log::info!("Registered user {} ({})", user.id, user.role);
    let token = tokens.issue(user.id)?;
    Ok(AuthPayload::new(user, token))
}

/// Checks credentials and returns the user with a fresh token.
///
/// An unknown email and a wrong password fail identically with `Unauthorized`.
pub async fn login<S: UserStore + ?Sized>(
    users: &S,
    tokens: &TokenIssuer,
    request: LoginRequest,
) -> Result<AuthPayload, AppError> {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (normalize_email(&email), password)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Please provide email and password".into(),
            ))
        }
    };

    let Some(credentials) = users.find_credentials_by_email(&email).await? else {
        log::warn!("Failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_async(password, credentials.password_hash).await? {
        log::warn!("Failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = tokens.issue(credentials.user.id)?;
    Ok(AuthPayload::new(credentials.user, token))
}

/// Returns the caller's own record.
pub async fn current_user<S: UserStore + ?Sized>(users: &S, user_id: Uuid) -> Result<User, AppError> {
    users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    const COST: u32 = 4;

    fn tokens() -> TokenIssuer {
        TokenIssuer::new("service-secret", Duration::hours(1))
    }

    fn alice() -> RegisterRequest {
        RegisterRequest {
            name: Some("Alice".into()),
            email: Some("a@x.com".into()),
            password: Some("pw123".into()),
            role: None,
        }
    }

    fn login_as(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[actix_rt::test]
    async fn test_register_returns_user_and_token() {
        let store = MemoryStore::new();
        let tokens = tokens();

        let payload = register(&store, &tokens, COST, alice()).await.unwrap();

        assert_eq!(payload.name, "Alice");
        assert_eq!(payload.email, "a@x.com");
        assert_eq!(payload.role, Role::User);
        assert_eq!(tokens.verify(&payload.token).unwrap().sub, payload.id);
    }

    #[actix_rt::test]
    async fn test_register_missing_fields() {
        let store = MemoryStore::new();
        let mut request = alice();
        request.email = None;

        match register(&store, &tokens(), COST, request).await {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Please provide all required fields"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_register_duplicate_email() {
        let store = MemoryStore::new();
        register(&store, &tokens(), COST, alice()).await.unwrap();

        let mut again = alice();
        again.email = Some(" A@X.COM ".into());
        match register(&store, &tokens(), COST, again).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "User already exists"),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let tokens = tokens();
        register(&store, &tokens, COST, alice()).await.unwrap();

        let wrong_password = login(&store, &tokens, login_as("a@x.com", "wrong")).await.unwrap_err();
        let unknown_email = login(&store, &tokens, login_as("nobody@x.com", "pw123")).await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    }

    #[actix_rt::test]
    async fn test_login_success_and_current_user() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let registered = register(&store, &tokens, COST, alice()).await.unwrap();

        let payload = login(&store, &tokens, login_as("a@x.com", "pw123")).await.unwrap();
        assert_eq!(payload.id, registered.id);

        let me = current_user(&store, payload.id).await.unwrap();
        assert_eq!(me.email, "a@x.com");
        assert!(matches!(
            current_user(&store, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_login_missing_fields() {
        let store = MemoryStore::new();
        let request = LoginRequest {
            email: Some("a@x.com".into()),
            password: None,
        };
        assert!(matches!(
            login(&store, &tokens(), request).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
