pub mod auth;
pub mod input;
pub mod messages;
pub mod session;
pub mod sort;
pub mod user;
