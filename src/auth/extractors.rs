use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::auth::token::Claims;
use crate::auth::{Requester, NOT_AUTHORIZED};
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The authenticated caller, loaded from the store.
///
/// Relies on `AuthMiddleware` having verified the token and stored its `Claims`.
/// Without claims the request is rejected with 401; if the token is valid but the
/// user it names no longer exists, with 404 `User not found`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn requester(&self) -> Requester {
        Requester::from(&self.0)
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| AppError::Unauthorized(NOT_AUTHORIZED.into()))?;
            let state = state
                .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

            let user = state
                .store
                .find_user_by_id(claims.sub)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".into()))?;

            Ok(CurrentUser(user))
        })
    }
}
