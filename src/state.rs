use std::sync::Arc;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::store::Store;

/// Shared application state, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub config: Config,
    pub tokens: TokenIssuer,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        let tokens = TokenIssuer::from_config(&config);
        Self {
            config,
            tokens,
            store,
        }
    }
}
