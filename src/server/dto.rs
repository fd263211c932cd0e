use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleInput;
use crate::types::AvailabilityLevel;

/// Body of the create and edit schedule forms.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleForm {
    #[serde(default)]
    pub schedule_name: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub candidates: String,
}

impl From<ScheduleForm> for ScheduleInput {
    fn from(form: ScheduleForm) -> Self {
        ScheduleInput {
            schedule_name: form.schedule_name,
            memo: form.memo,
            candidates: form.candidates,
        }
    }
}

/// `?edit=1` or `?delete=1` on `POST /schedules/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleActionParams {
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub delete: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub availability: i64,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    #[serde(default)]
    pub from: Option<String>,
}

/// Field order is part of the wire format: `{"status":"OK","availability":n}`.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub status: &'static str,
    pub availability: AvailabilityLevel,
}

/// Field order is part of the wire format: `{"status":"OK","comment":"..."}`.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub status: &'static str,
    pub comment: String,
}

impl AvailabilityResponse {
    #[must_use]
    pub fn ok(availability: AvailabilityLevel) -> Self {
        Self {
            status: "OK",
            availability,
        }
    }
}

impl CommentResponse {
    #[must_use]
    pub fn ok(comment: String) -> Self {
        Self {
            status: "OK",
            comment,
        }
    }
}
