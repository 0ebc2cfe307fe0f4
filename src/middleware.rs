pub mod auth;
pub use auth::{auth_guard, CurrentSession};
pub mod rbac;
pub use rbac::RequirePermission;
