pub mod error;
pub use error::AppError;
pub mod money;
pub mod validation;
