/// Password hashing, access tokens and the authenticated-caller extractor
pub mod auth;
/// Error to HTTP response mapping
pub mod error_handling;
