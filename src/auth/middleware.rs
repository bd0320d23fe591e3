use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::Claims;
use crate::auth::NOT_AUTHORIZED;
use crate::error::AppError;
use crate::state::AppState;

/// Routes under the protected scope that do not need a token.
pub const PUBLIC_PATHS: &[&str] = &["/api/v1/auth/register", "/api/v1/auth/login"];

/// Verifies the bearer token of every request it wraps and stores the decoded
/// `Claims` in the request extensions for the extractors downstream.
///
/// Rejected requests are answered here with the 401 envelope, so outer
/// middleware (CORS, access log) sees an ordinary response.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !PUBLIC_PATHS.contains(&req.path()) {
            match authenticate(&req) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                }
                Err(app_err) => {
                    let response = req.error_response(app_err).map_into_right_body();
                    return Box::pin(ready(Ok(response)));
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.into()))?;

    state.tokens.verify(token).map_err(|err| {
        log::debug!("Rejected token on {}: {}", req.path(), err);
        AppError::Unauthorized(NOT_AUTHORIZED.into())
    })
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    if !value.starts_with("Bearer") {
        return None;
    }
    value.split(' ').nth(1).filter(|token| !token.is_empty())
}
