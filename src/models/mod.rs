pub mod task;
pub mod user;

pub use task::{
    CreateTaskRequest, NewTask, Task, TaskDetail, TaskOwner, TaskPatch, TaskStatus,
    UpdateTaskRequest,
};
pub use user::{
    AuthPayload, LoginRequest, NewUser, RegisterRequest, Registration, Role, User,
    UserCredentials,
};
