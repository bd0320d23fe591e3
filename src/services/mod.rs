//! Business operations, independent of HTTP. Handlers in `routes` are thin
//! wrappers that extract the caller and delegate here.

pub mod auth;
pub mod tasks;
