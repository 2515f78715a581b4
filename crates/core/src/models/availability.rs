use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::weekday::Weekday;

/// A slot as submitted by a caller, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedSlot {
    pub day: String,
    pub start: String,
    pub end: String,
}

impl ProposedSlot {
    pub fn new(day: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A parsed slot that passed validation and is ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewSlot {
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl NewSlot {
    /// Half-open interval test: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &NewSlot) -> bool {
        self.day == other.day && self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// A persisted availability slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    pub fn as_new_slot(&self) -> NewSlot {
        NewSlot {
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Whole-schedule replace payload. An empty `slots` is rejected by the
/// service, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    pub slots: Vec<ProposedSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityResponse {
    pub owner_id: Uuid,
    pub slots_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            day: slot.day,
            start: slot.start_time,
            end: slot.end_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub owner_id: Uuid,
    pub slots: Vec<SlotResponse>,
}
