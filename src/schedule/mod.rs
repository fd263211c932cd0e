//! The schedule aggregate: a schedule, its candidates, and the per-user
//! availabilities and comments recorded against it.
//!
//! Every mutation goes through this module. Edits only ever append
//! candidates; deletion removes dependents before the root in one
//! transaction.

mod candidates;
mod detail;
mod manager;

pub use candidates::{names_to_append, parse_candidate_names};
pub use detail::{ParticipantRow, ScheduleDetail, load_schedule_detail};
pub use manager::{
    MAX_COMMENT_LEN, MAX_SCHEDULE_NAME_LEN, ScheduleInput, create_schedule, delete_schedule,
    edit_schedule, require_creator, set_availability, set_comment,
};
