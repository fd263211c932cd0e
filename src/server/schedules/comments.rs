use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::schedule;
use crate::server::AppState;
use crate::server::dto::{CommentRequest, CommentResponse};
use crate::server::extract::JsonOrForm;
use crate::server::response::ApiError;

pub async fn update_comment(
    RequireUser(_caller): RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(String, i64)>,
    JsonOrForm(req): JsonOrForm<CommentRequest>,
) -> impl IntoResponse {
    let stored = schedule::set_comment(state.store.as_ref(), &id, user_id, &req.comment)?;

    Ok::<_, ApiError>(Json(CommentResponse::ok(stored)))
}
