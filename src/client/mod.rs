//! Client for the task API, used by the `taskctl` binary.
//!
//! `SessionStore` keeps the token and a snapshot of the logged-in user on disk,
//! `ApiClient` attaches the token to every call, and `Dashboard` holds the view
//! state of the task screen.

pub mod api;
pub mod dashboard;
pub mod session;

use thiserror::Error;

pub use api::ApiClient;
pub use dashboard::{Dashboard, Flash};
pub use session::{Session, SessionStore, SessionUser};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with an error envelope.
    #[error("{message} ({status})")]
    Api { status: u16, message: String },
    /// A 401 on an authenticated call. The stored session has been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,
    #[error("Not logged in, run `taskctl login` first")]
    NotLoggedIn,
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed data: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the caller has to log in (again) before continuing.
    pub fn needs_login(&self) -> bool {
        matches!(self, ClientError::SessionExpired | ClientError::NotLoggedIn)
    }
}
