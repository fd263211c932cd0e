use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{AvailabilityLevel, Candidate, Schedule, ScheduleAggregate, User};

/// Everything the detail page shows for one schedule.
#[derive(Debug, Clone)]
pub struct ScheduleDetail {
    pub schedule: Schedule,
    pub creator: Option<User>,
    pub candidates: Vec<Candidate>,
    pub rows: Vec<ParticipantRow>,
    pub viewer_is_creator: bool,
}

/// One user's line in the attendance matrix. `cells` follows the order of
/// `ScheduleDetail::candidates`.
#[derive(Debug, Clone)]
pub struct ParticipantRow {
    pub user: User,
    pub cells: Vec<(i64, AvailabilityLevel)>,
    pub comment: String,
    pub is_viewer: bool,
}

/// Builds the attendance matrix of a schedule as seen by `viewer`. Cells
/// with no stored answer read as `Absent`; the viewer always has a row,
/// listed first.
pub fn load_schedule_detail(
    store: &dyn Store,
    schedule_id: &str,
    viewer: &User,
) -> Result<ScheduleDetail> {
    let ScheduleAggregate {
        schedule,
        creator,
        candidates,
        availabilities,
        comments,
        mut participants,
    } = store
        .load_schedule_aggregate(schedule_id)?
        .ok_or(Error::NotFound)?;

    let answers: HashMap<(i64, i64), AvailabilityLevel> = availabilities
        .into_iter()
        .map(|a| ((a.user_id, a.candidate_id), a.availability))
        .collect();

    let mut comments: HashMap<i64, String> = comments
        .into_iter()
        .map(|c| (c.user_id, c.comment))
        .collect();

    participants.retain(|u| u.user_id != viewer.user_id);
    participants.insert(0, viewer.clone());

    let rows = participants
        .into_iter()
        .map(|user| {
            let cells = candidates
                .iter()
                .map(|c| {
                    let level = answers
                        .get(&(user.user_id, c.candidate_id))
                        .copied()
                        .unwrap_or_default();
                    (c.candidate_id, level)
                })
                .collect();
            ParticipantRow {
                comment: comments.remove(&user.user_id).unwrap_or_default(),
                is_viewer: user.user_id == viewer.user_id,
                user,
                cells,
            }
        })
        .collect();

    Ok(ScheduleDetail {
        viewer_is_creator: schedule.created_by == viewer.user_id,
        schedule,
        creator,
        candidates,
        rows,
    })
}
