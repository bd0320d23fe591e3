use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{LoginRequest, RegisterRequest},
    response::ApiResponse,
    services,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns it with an authentication token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = crate::models::AuthPayload),
        (status = 400, description = "Missing fields, invalid input or email already registered"),
    )
)]
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let payload = services::auth::register(
        &*state.store,
        &state.tokens,
        state.config.bcrypt_cost,
        register_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(payload)))
}

/// Login user
///
/// Authenticates a user and returns an authentication token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = crate::models::AuthPayload),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let payload =
        services::auth::login(&*state.store, &state.tokens, login_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(payload)))
}

/// Current user
///
/// Returns the record of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller", body = crate::models::User),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "The token's user no longer exists"),
    )
)]
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let user = services::auth::current_user(&*state.store, user.0.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
