use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attendance for a single candidate. Stored and transmitted as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AvailabilityLevel {
    /// No answer yet, or absent. Cells without a row read as this.
    #[default]
    Absent = 0,
    Undecided = 1,
    Attending = 2,
}

impl AvailabilityLevel {
    pub const ALL: [AvailabilityLevel; 3] = [
        AvailabilityLevel::Absent,
        AvailabilityLevel::Undecided,
        AvailabilityLevel::Attending,
    ];

    pub const fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.ordinal() == value)
    }

    /// Short label used in the attendance matrix.
    pub const fn label(self) -> &'static str {
        match self {
            AvailabilityLevel::Absent => "No",
            AvailabilityLevel::Undecided => "?",
            AvailabilityLevel::Attending => "Yes",
        }
    }

    /// The level a cell cycles to when clicked.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            AvailabilityLevel::Absent => AvailabilityLevel::Undecided,
            AvailabilityLevel::Undecided => AvailabilityLevel::Attending,
            AvailabilityLevel::Attending => AvailabilityLevel::Absent,
        }
    }
}

impl TryFrom<i64> for AvailabilityLevel {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_ordinal(value).ok_or(value)
    }
}

impl fmt::Display for AvailabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}

impl Serialize for AvailabilityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for AvailabilityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::from_ordinal(value).ok_or_else(|| {
            serde::de::Error::custom(format!("availability must be 0, 1 or 2, got {value}"))
        })
    }
}
