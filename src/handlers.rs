pub mod session;
pub mod permissions;
pub mod navigation;
pub mod salary;
pub mod employees;
