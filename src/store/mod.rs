mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the persistence interface for the schedule aggregate.
///
/// Methods that touch more than one row run in a single transaction, so a
/// caller never observes a schedule without its candidates or dependents
/// that outlive their schedule.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn upsert_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    // Schedule operations
    /// Inserts the schedule and one candidate per name, ordered by position.
    fn create_schedule(&self, schedule: &Schedule, candidate_names: &[String])
    -> Result<Vec<Candidate>>;
    fn get_schedule(&self, schedule_id: &str) -> Result<Option<Schedule>>;
    fn list_schedules_by_creator(&self, user_id: i64) -> Result<Vec<Schedule>>;
    /// Reads the schedule and all of its dependents in one transaction, so a
    /// concurrent delete is seen either completely or not at all.
    fn load_schedule_aggregate(&self, schedule_id: &str) -> Result<Option<ScheduleAggregate>>;
    /// Updates name, memo and `updated_at`, then appends the given candidate
    /// names after the current maximum display order. Names already present
    /// on the schedule are skipped. Returns the appended candidates.
    fn update_schedule(&self, schedule: &Schedule, append_names: &[String])
    -> Result<Vec<Candidate>>;
    /// Removes the listed parts of the aggregate, in order, atomically.
    fn delete_schedule_aggregate(
        &self,
        schedule_id: &str,
        steps: &[AggregatePart],
    ) -> Result<DeletionReport>;

    // Candidate operations
    fn get_candidate(&self, candidate_id: i64) -> Result<Option<Candidate>>;
    fn list_candidates(&self, schedule_id: &str) -> Result<Vec<Candidate>>;

    // Availability operations
    fn upsert_availability(&self, availability: &Availability) -> Result<()>;
    fn list_availabilities(&self, schedule_id: &str) -> Result<Vec<Availability>>;

    // Comment operations
    fn upsert_comment(&self, comment: &Comment) -> Result<()>;
    fn list_comments(&self, schedule_id: &str) -> Result<Vec<Comment>>;

    /// Users with an availability or a comment on the schedule.
    fn list_schedule_participants(&self, schedule_id: &str) -> Result<Vec<User>>;
}
