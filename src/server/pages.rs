use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::server::AppState;
use crate::server::dto::LoginParams;
use crate::server::render;
use crate::server::response::{ApiError, StoreResultExt, found};

pub async fn index(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let schedules = match &user {
        Some(user) => state
            .store
            .list_schedules_by_creator(user.user_id)
            .api_err("Failed to list schedules")?,
        None => Vec::new(),
    };

    Ok::<_, ApiError>(render::index_page(user.as_ref(), &schedules))
}

pub async fn login(
    CurrentUser(user): CurrentUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<LoginParams>,
) -> impl IntoResponse {
    render::login_page(
        user.as_ref(),
        state.identity.login_url(),
        params.from.as_deref(),
    )
}

/// Sessions live with the identity provider; leaving only sends the browser
/// back to the root.
pub async fn logout() -> impl IntoResponse {
    found("/")
}
