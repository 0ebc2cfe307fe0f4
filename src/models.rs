pub mod permission;
pub mod session;
pub mod navigation;
pub mod salary;
pub mod employee;
