use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::schedule;
use crate::server::AppState;
use crate::server::dto::{AvailabilityRequest, AvailabilityResponse};
use crate::server::extract::JsonOrForm;
use crate::server::response::ApiError;

// The path names the user whose cell is written, which need not be the
// caller. Kept as-is; see DESIGN.md before tightening.
pub async fn update_availability(
    RequireUser(_caller): RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, user_id, candidate_id)): Path<(String, i64, i64)>,
    JsonOrForm(req): JsonOrForm<AvailabilityRequest>,
) -> impl IntoResponse {
    let stored = schedule::set_availability(
        state.store.as_ref(),
        &id,
        user_id,
        candidate_id,
        req.availability,
    )?;

    Ok::<_, ApiError>(Json(AvailabilityResponse::ok(stored)))
}
