pub mod auth;
pub mod config;
pub mod places;
pub mod route;
pub mod users;
