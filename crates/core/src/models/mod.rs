pub mod availability;
pub mod user;
pub mod weekday;

pub use availability::{
    AvailabilityResponse, NewSlot, ProposedSlot, SetAvailabilityRequest, SetAvailabilityResponse,
    Slot, SlotResponse,
};
pub use user::{NewUser, Role, User};
pub use weekday::Weekday;
