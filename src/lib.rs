#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication, persistence, business services, HTTP routing and"]
#![doc = "error handling for the task management API, plus the client used by `taskctl`."]
#![doc = "The `taskdesk` binary builds an `AppState` and serves `configure_app` with it."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

/// Picks the store backend and assembles the shared state.
///
/// With `DATABASE_URL` set the Postgres store is connected and migrated;
/// otherwise everything lives in memory for the lifetime of the process.
pub async fn build_app_state(config: Config) -> Result<AppState, AppError> {
    let store: Arc<dyn Store> = match config.database_url.clone() {
        Some(url) => {
            let store = PgStore::connect(&config, &url).await?;
            store.migrate().await?;
            log::info!("Using Postgres store");
            Arc::new(store)
        }
        None => {
            log::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(AppState::new(config, store))
}

/// Registers every route and extractor setting on an `App`.
///
/// `AppState` must be registered separately with `App::app_data`.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(routes::json_config())
        .app_data(routes::path_config())
        .service(routes::health::welcome)
        .service(routes::health::health)
        .service(routes::docs::openapi_json)
        .service(
            web::scope("/api/v1")
                .wrap(AuthMiddleware)
                .configure(routes::config),
        )
        .default_service(web::route().to(routes::not_found));
}
