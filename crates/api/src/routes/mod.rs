pub mod auth;
pub mod availability;
pub mod health;
