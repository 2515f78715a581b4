use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day label of a recurring weekly slot.
///
/// Variants are declared in canonical order (Monday first), so the derived
/// `Ord` sorts days the way schedules are presented, not alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Senin,
    Selasa,
    Rabu,
    Kamis,
    Jumat,
    Sabtu,
    Minggu,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid day: {0}")]
pub struct UnknownWeekday(pub String);

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Senin,
        Weekday::Selasa,
        Weekday::Rabu,
        Weekday::Kamis,
        Weekday::Jumat,
        Weekday::Sabtu,
        Weekday::Minggu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Senin => "Senin",
            Weekday::Selasa => "Selasa",
            Weekday::Rabu => "Rabu",
            Weekday::Kamis => "Kamis",
            Weekday::Jumat => "Jumat",
            Weekday::Sabtu => "Sabtu",
            Weekday::Minggu => "Minggu",
        }
    }

    /// Labels in canonical order, as stored in the database.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|day| day.as_str()).collect()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the canonical labels.
impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}
