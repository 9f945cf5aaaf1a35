pub mod admin;
pub mod common;
pub mod context;
pub mod pagination;
pub mod user;

pub use admin::*;
pub use common::*;
pub use context::*;
pub use pagination::*;
pub use user::*;
