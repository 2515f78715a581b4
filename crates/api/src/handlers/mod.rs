/// Registration, login and profile
pub mod auth;
/// Weekly availability of psychologists
pub mod availability;
