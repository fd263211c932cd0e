use std::sync::Arc;

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    response::{IntoResponse, Response},
};

use crate::auth::RequireUser;
use crate::schedule::{self, load_schedule_detail, require_creator};
use crate::server::AppState;
use crate::server::dto::{ScheduleActionParams, ScheduleForm};
use crate::server::extract::JsonOrForm;
use crate::server::render;
use crate::server::response::{ApiError, StoreResultExt, found};

fn schedule_path(id: &str) -> String {
    format!("/schedules/{id}")
}

pub async fn new_schedule_form(RequireUser(user): RequireUser) -> impl IntoResponse {
    render::new_schedule_page(&user)
}

pub async fn create_schedule(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    JsonOrForm(form): JsonOrForm<ScheduleForm>,
) -> impl IntoResponse {
    let schedule = schedule::create_schedule(state.store.as_ref(), &user, &form.into())?;

    Ok::<_, ApiError>(found(schedule_path(&schedule.schedule_id)))
}

pub async fn show_schedule(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let detail = load_schedule_detail(state.store.as_ref(), &id, &user)?;

    Ok::<_, ApiError>(render::schedule_page(&user, &detail))
}

pub async fn edit_schedule_form(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let schedule = require_creator(store, &user, &id)?;
    let candidates = store
        .list_candidates(&id)
        .api_err("Failed to list candidates")?;

    Ok::<_, ApiError>(render::edit_schedule_page(&user, &schedule, &candidates))
}

/// `POST /schedules/{id}?edit=1` updates, `?delete=1` removes the whole
/// aggregate. Only the delete form comes without a body, so the body is
/// parsed on the edit path only.
pub async fn update_schedule(
    RequireUser(user): RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ScheduleActionParams>,
    request: Request,
) -> Result<Response, ApiError> {
    let store = state.store.as_ref();

    if params.edit.is_some() {
        let JsonOrForm(form) = JsonOrForm::<ScheduleForm>::from_request(request, &state).await?;
        schedule::edit_schedule(store, &user, &id, &form.into())?;
        return Ok(found(schedule_path(&id)));
    }

    if params.delete.is_some() {
        schedule::delete_schedule(store, &user, &id)?;
        return Ok(found("/"));
    }

    Err(ApiError::bad_request("Expected ?edit=1 or ?delete=1"))
}
