//! # Schedule Validator
//!
//! Pure checks applied to a proposed weekly schedule before anything is
//! written. A schedule is accepted only when every slot is well formed and no
//! two slots on the same day overlap.
//!
//! Times use the fixed `HH:MM:SS` format (24-hour, zero-padded, seconds
//! mandatory) and carry no date or timezone.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime, Timelike};
use thiserror::Error;

use crate::models::{NewSlot, ProposedSlot, Weekday};

/// Shortest slot a psychologist may publish.
pub const MIN_SLOT_MINUTES: i64 = 30;

pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("invalid day: {0}")]
    InvalidDay(String),

    #[error("invalid time format: {0:?} (expected HH:MM:SS)")]
    InvalidTimeFormat(String),

    #[error("start time must be before end time")]
    StartNotBeforeEnd,

    #[error("minimum consultation duration is 30 minutes")]
    DurationTooShort,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("slots must not be empty")]
    Empty,

    #[error("slot {index} ({day} {start}-{end}): {source}")]
    InvalidSlot {
        index: usize,
        day: String,
        start: String,
        end: String,
        source: SlotError,
    },

    #[error(
        "overlapping slots for {day}: {first_start}-{first_end} and {second_start}-{second_end}"
    )]
    OverlappingSlots {
        day: Weekday,
        first_start: NaiveTime,
        first_end: NaiveTime,
        second_start: NaiveTime,
        second_end: NaiveTime,
    },
}

/// Parses a strict `HH:MM:SS` time of day.
///
/// chrono alone would accept single-digit fields and leap seconds, so the
/// shape is checked first.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, SlotError> {
    let bytes = value.as_bytes();
    let well_shaped = bytes.len() == 8
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b':',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(SlotError::InvalidTimeFormat(value.to_string()));
    }

    let time = NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| SlotError::InvalidTimeFormat(value.to_string()))?;
    if time.nanosecond() != 0 {
        return Err(SlotError::InvalidTimeFormat(value.to_string()));
    }

    Ok(time)
}

/// Checks one slot in isolation.
pub fn validate_slot(day: &str, start: &str, end: &str) -> Result<NewSlot, SlotError> {
    let day: Weekday = day
        .parse()
        .map_err(|_| SlotError::InvalidDay(day.to_string()))?;
    let start_time = parse_time_of_day(start)?;
    let end_time = parse_time_of_day(end)?;

    if start_time >= end_time {
        return Err(SlotError::StartNotBeforeEnd);
    }
    if end_time - start_time < Duration::minutes(MIN_SLOT_MINUTES) {
        return Err(SlotError::DurationTooShort);
    }

    Ok(NewSlot {
        day,
        start_time,
        end_time,
    })
}

/// Validates a whole proposed schedule.
///
/// Returns the parsed slots in input order. An empty input yields an empty
/// schedule; whether that may be persisted is the caller's policy.
pub fn validate_schedule(slots: &[ProposedSlot]) -> Result<Vec<NewSlot>, ScheduleError> {
    let parsed = slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            validate_slot(&slot.day, &slot.start, &slot.end).map_err(|source| {
                ScheduleError::InvalidSlot {
                    index,
                    day: slot.day.clone(),
                    start: slot.start.clone(),
                    end: slot.end.clone(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    check_overlaps(&parsed)?;

    Ok(parsed)
}

/// Pairwise overlap test within each day. Days are visited in canonical
/// order and the first conflicting pair found is reported.
fn check_overlaps(slots: &[NewSlot]) -> Result<(), ScheduleError> {
    let mut by_day: BTreeMap<Weekday, Vec<&NewSlot>> = BTreeMap::new();
    for slot in slots {
        by_day.entry(slot.day).or_default().push(slot);
    }

    for (day, day_slots) in &by_day {
        if let Some((first, second)) = find_overlap(day_slots) {
            return Err(ScheduleError::OverlappingSlots {
                day: *day,
                first_start: first.start_time,
                first_end: first.end_time,
                second_start: second.start_time,
                second_end: second.end_time,
            });
        }
    }

    Ok(())
}

fn find_overlap<'a>(slots: &[&'a NewSlot]) -> Option<(&'a NewSlot, &'a NewSlot)> {
    slots.iter().enumerate().find_map(|(i, first)| {
        slots[i + 1..]
            .iter()
            .find(|second| first.overlaps(second))
            .map(|second| (*first, *second))
    })
}
