pub mod admin_service;
pub mod auth_service;
pub mod phone_backend;
pub mod session_store;
pub mod user_manager;
pub mod user_service;

pub use admin_service::*;
pub use auth_service::*;
pub use phone_backend::*;
pub use session_store::*;
pub use user_manager::*;
pub use user_service::*;
