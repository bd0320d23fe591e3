pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Role, Task, User};

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

/// Message for every missing, malformed or rejected token.
pub const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Role gate: fails with 403 unless the user holds one of `allowed`.
pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User role '{}' is not authorized to access this route",
            user.role
        )))
    }
}

/// Who is asking, passed explicitly into every task operation.
///
/// Reading is allowed to the owner and to administrators; changing or deleting a
/// task is allowed to the owner only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub role: Role,
}

impl Requester {
    pub fn owns(&self, task: &Task) -> bool {
        task.created_by == self.id
    }

    pub fn can_read(&self, task: &Task) -> bool {
        self.owns(task) || self.role == Role::Admin
    }

    pub fn can_modify(&self, task: &Task) -> bool {
        self.owns(task)
    }
}

impl From<&User> for Requester {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}
