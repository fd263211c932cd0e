use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::LOCATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::server::AppState;
use crate::types::User;

/// Extractor for pages that render for anonymous visitors too.
pub struct CurrentUser(pub Option<User>);

/// Extractor that requires a signed-in user. Anonymous callers are sent to
/// the login page.
pub struct RequireUser(pub User);

#[derive(Debug)]
pub enum AuthError {
    LoginRequired { from: String },
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::LoginRequired { from } => {
                let location = format!("/login?from={}", urlencoding::encode(&from));
                (StatusCode::FOUND, [(LOCATION, location)]).into_response()
            }
            AuthError::InternalError => {
                let body = json!({ "status": "NG", "error": "Internal server error" });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state)?;
        Ok(CurrentUser(user))
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state)?.ok_or_else(|| {
            let from = parts
                .uri
                .path_and_query()
                .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());
            AuthError::LoginRequired { from }
        })?;

        Ok(RequireUser(user))
    }
}

/// Asks the identity provider for the caller and records the user so names
/// shown on schedules stay current.
fn resolve_user(parts: &Parts, state: &Arc<AppState>) -> Result<Option<User>, AuthError> {
    let Some(user) = state.identity.current_user(&parts.headers) else {
        return Ok(None);
    };

    state.store.upsert_user(&user).map_err(|e| {
        tracing::error!("Failed to record user {}: {e}", user.user_id);
        AuthError::InternalError
    })?;

    Ok(Some(user))
}
