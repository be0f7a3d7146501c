pub mod change_password;
pub mod details;
pub mod list;
