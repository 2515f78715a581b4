//! # Konsul Core
//!
//! Domain types and rules for the Konsul counseling-booking backend.
//!
//! The crate has no knowledge of HTTP or SQL. It owns:
//!
//! - **Models**: users, roles, weekdays and availability slots
//! - **Schedule**: the validator that accepts or rejects a proposed weekly schedule
//! - **Repositories**: the storage contracts implemented by `konsul-db`
//! - **Services**: orchestration of validation and storage for availability

pub mod errors;
pub mod models;
pub mod repositories;
pub mod schedule;
pub mod services;
