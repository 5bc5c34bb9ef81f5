use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use crate::errors::{ApiError, ApiResult, AppError};
use crate::middleware::CurrentSession;
use crate::models::{present, ProfileQuery};
use crate::services::policy;
use crate::state::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Response> {
    let username = present(&query.username);
    let email = present(&query.email);
    if username.is_none() && email.is_none() {
        return Err(AppError::Validation("Username or email is required!!".into()).into());
    }

    let users = state.users.lock().await;
    let user = users
        .find_profile(username, email)
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    tracing::debug!("Serving profile for {}", user.username);
    Ok(Json(user).into_response())
}

// Admin only, ownership of the profile is not enough
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Response> {
    let username = present(&query.username)
        .ok_or_else(|| AppError::Validation("Username is required!!".into()))?;

    if !policy::can_delete_profile(session.identity()) {
        tracing::warn!("Profile deletion of {} refused: caller is not admin", username);
        return Err(ApiError::from(AppError::Auth("You are not admin".into()))
            .with_status(StatusCode::BAD_REQUEST));
    }

    state.users.lock().await.delete(username)?;

    Ok(Json(json!({ "message": "User deleted!" })).into_response())
}
