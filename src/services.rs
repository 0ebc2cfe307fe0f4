pub mod permission_service;
pub use permission_service::PermissionEngine;
pub mod session_service;
pub use session_service::{SessionService, SessionStore};
pub mod navigation_service;
pub use navigation_service::NavigationCatalog;
pub mod salary_service;
pub mod employee_service;
pub use employee_service::EmployeeService;
