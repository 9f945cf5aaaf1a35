pub mod users;

pub use users as user_entity;
pub use users::UserStatus;
