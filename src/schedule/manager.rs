use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::candidates::{names_to_append, parse_candidate_names};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{
    AggregatePart, Availability, AvailabilityLevel, Candidate, Comment, DeletionReport, Schedule,
    User,
};

pub const MAX_SCHEDULE_NAME_LEN: usize = 255;
pub const MAX_COMMENT_LEN: usize = 255;

/// Submitted schedule fields, shared by create and edit.
#[derive(Debug, Clone, Default)]
pub struct ScheduleInput {
    pub schedule_name: String,
    pub memo: String,
    /// Newline-separated candidate names.
    pub candidates: String,
}

impl ScheduleInput {
    /// The name is stored as submitted; surrounding whitespace only counts
    /// when deciding whether it is blank.
    fn validated_name(&self) -> Result<String> {
        if self.schedule_name.trim().is_empty() {
            return Err(Error::Validation("Schedule name cannot be empty".to_string()));
        }
        if self.schedule_name.chars().count() > MAX_SCHEDULE_NAME_LEN {
            return Err(Error::Validation(format!(
                "Schedule name cannot exceed {MAX_SCHEDULE_NAME_LEN} characters"
            )));
        }
        Ok(self.schedule_name.clone())
    }
}

/// Creates a schedule and its candidates as one unit.
pub fn create_schedule(store: &dyn Store, creator: &User, input: &ScheduleInput) -> Result<Schedule> {
    let schedule_name = input.validated_name()?;
    let names = parse_candidate_names(&input.candidates);
    if names.is_empty() {
        return Err(Error::Validation(
            "At least one candidate is required".to_string(),
        ));
    }

    let now = Utc::now();
    let schedule = Schedule {
        schedule_id: Uuid::new_v4().to_string(),
        schedule_name,
        memo: input.memo.clone(),
        created_by: creator.user_id,
        created_at: now,
        updated_at: now,
    };

    let candidates = store.create_schedule(&schedule, &names)?;

    info!(
        schedule_id = %schedule.schedule_id,
        created_by = creator.user_id,
        candidates = candidates.len(),
        "schedule created"
    );

    Ok(schedule)
}

/// Loads a schedule and checks that `caller` created it.
pub fn require_creator(store: &dyn Store, caller: &User, schedule_id: &str) -> Result<Schedule> {
    let schedule = store.get_schedule(schedule_id)?.ok_or(Error::NotFound)?;

    if schedule.created_by != caller.user_id {
        warn!(
            schedule_id,
            caller = caller.user_id,
            "rejected change from non-creator"
        );
        return Err(Error::Forbidden);
    }

    Ok(schedule)
}

/// Updates name and memo and appends candidates not already on the
/// schedule. Existing candidates keep their ids and order. Returns the
/// appended candidates.
pub fn edit_schedule(
    store: &dyn Store,
    caller: &User,
    schedule_id: &str,
    input: &ScheduleInput,
) -> Result<Vec<Candidate>> {
    let mut schedule = require_creator(store, caller, schedule_id)?;
    let schedule_name = input.validated_name()?;

    let existing = store.list_candidates(schedule_id)?;
    let to_append = names_to_append(&existing, &parse_candidate_names(&input.candidates));

    schedule.schedule_name = schedule_name;
    schedule.memo = input.memo.clone();
    schedule.updated_at = Utc::now();

    let appended = store.update_schedule(&schedule, &to_append)?;

    info!(
        schedule_id,
        appended = appended.len(),
        total = existing.len() + appended.len(),
        "schedule updated"
    );

    Ok(appended)
}

/// Records one attendance cell, overwriting any previous value.
///
/// Any authenticated caller may write the cell of any `user_id`; there is no
/// self-only check here.
pub fn set_availability(
    store: &dyn Store,
    schedule_id: &str,
    user_id: i64,
    candidate_id: i64,
    ordinal: i64,
) -> Result<AvailabilityLevel> {
    let availability = AvailabilityLevel::try_from(ordinal).map_err(|value| {
        Error::Validation(format!("availability must be 0, 1 or 2, got {value}"))
    })?;

    let candidate = store.get_candidate(candidate_id)?.ok_or(Error::NotFound)?;
    if candidate.schedule_id != schedule_id {
        return Err(Error::NotFound);
    }

    store.upsert_availability(&Availability {
        schedule_id: schedule_id.to_string(),
        user_id,
        candidate_id,
        availability,
    })?;

    debug!(schedule_id, user_id, candidate_id, %availability, "availability stored");

    Ok(availability)
}

/// Records a user's comment on a schedule. An empty string clears it.
pub fn set_comment(
    store: &dyn Store,
    schedule_id: &str,
    user_id: i64,
    comment: &str,
) -> Result<String> {
    if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(Error::Validation(format!(
            "Comment cannot exceed {MAX_COMMENT_LEN} characters"
        )));
    }

    store.upsert_comment(&Comment {
        schedule_id: schedule_id.to_string(),
        user_id,
        comment: comment.to_string(),
    })?;

    debug!(schedule_id, user_id, "comment stored");

    Ok(comment.to_string())
}

/// Removes a schedule with all its availabilities, comments and candidates.
/// Either everything is removed or nothing is.
pub fn delete_schedule(
    store: &dyn Store,
    caller: &User,
    schedule_id: &str,
) -> Result<DeletionReport> {
    require_creator(store, caller, schedule_id)?;

    let report = store
        .delete_schedule_aggregate(schedule_id, &AggregatePart::DELETION_ORDER)
        .inspect_err(|e| tracing::error!(schedule_id, "schedule delete failed: {e}"))?;

    // Lost a race with another delete between the check and the transaction.
    if !report.schedule_removed() {
        return Err(Error::NotFound);
    }

    info!(
        schedule_id,
        availabilities = report.count(AggregatePart::Availabilities),
        comments = report.count(AggregatePart::Comments),
        candidates = report.count(AggregatePart::Candidates),
        "schedule deleted"
    );

    Ok(report)
}
