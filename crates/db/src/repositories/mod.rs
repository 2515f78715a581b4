pub mod availability;
pub mod user;

pub use availability::PgAvailabilityRepository;
pub use user::PgUserRepository;
