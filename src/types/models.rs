use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AvailabilityLevel;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
}

/// Root of the schedule aggregate. Candidates, availabilities and comments
/// hang off `schedule_id` and never outlive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: String,
    pub schedule_name: String,
    pub memo: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: i64,
    pub candidate_name: String,
    pub schedule_id: String,
    pub display_order: i64,
}

/// One cell of the attendance matrix, keyed by (schedule, user, candidate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub schedule_id: String,
    pub user_id: i64,
    pub candidate_id: i64,
    pub availability: AvailabilityLevel,
}

/// At most one per (schedule, user). Empty text means "no comment".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub schedule_id: String,
    pub user_id: i64,
    pub comment: String,
}

/// A schedule with everything recorded against it, read from one snapshot.
#[derive(Debug, Clone)]
pub struct ScheduleAggregate {
    pub schedule: Schedule,
    pub creator: Option<User>,
    pub candidates: Vec<Candidate>,
    pub availabilities: Vec<Availability>,
    pub comments: Vec<Comment>,
    /// Users with an availability or a comment on the schedule.
    pub participants: Vec<User>,
}

/// The dependent collections of a schedule, in the order they are removed
/// by a cascading delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatePart {
    Availabilities,
    Comments,
    Candidates,
    Schedule,
}

impl AggregatePart {
    pub const DELETION_ORDER: [AggregatePart; 4] = [
        AggregatePart::Availabilities,
        AggregatePart::Comments,
        AggregatePart::Candidates,
        AggregatePart::Schedule,
    ];

    pub const fn table(self) -> &'static str {
        match self {
            AggregatePart::Availabilities => "availabilities",
            AggregatePart::Comments => "comments",
            AggregatePart::Candidates => "candidates",
            AggregatePart::Schedule => "schedules",
        }
    }
}

/// Rows removed per part by a cascading delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub removed: Vec<(AggregatePart, usize)>,
}

impl DeletionReport {
    pub fn count(&self, part: AggregatePart) -> usize {
        self.removed
            .iter()
            .find(|(p, _)| *p == part)
            .map_or(0, |(_, n)| *n)
    }

    /// True when the root row itself was removed.
    pub fn schedule_removed(&self) -> bool {
        self.count(AggregatePart::Schedule) > 0
    }
}
