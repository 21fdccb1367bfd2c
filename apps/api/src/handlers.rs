pub mod auth;
pub mod health;
pub mod members;
pub mod organizations;
pub mod permissions;
pub mod teams;
pub mod users;
