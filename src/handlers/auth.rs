use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use crate::errors::{ApiError, ApiResult, AppError};
use crate::models::{present, Identity, LoginForm, RegisterForm, Role};
use crate::state::AppState;
use super::form_or_default;

#[axum::debug_handler]
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterForm>, JsonRejection>,
) -> ApiResult<Response> {
    let form = form_or_default(payload);
    let (username, email, password) = match (present(&form.username), present(&form.email), present(&form.password)) {
        (Some(username), Some(email), Some(password)) => (username, email, password),
        _ => return Err(missing_fields()),
    };

    // Role is optional and falls back to the configured default
    let role = match present(&form.role) {
        Some(role) => role
            .parse::<Role>()
            .map_err(|e| ApiError::from(AppError::Validation(e)).with_status(StatusCode::OK))?,
        None => state.config.user.default_role,
    };

    let user = state
        .users
        .lock()
        .await
        .register(username, email, password, role)?;

    Ok(Json(user).into_response())
}

#[axum::debug_handler]
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> ApiResult<Response> {
    let form = form_or_default(payload);
    // Either field may carry the identifier; username wins when both are sent
    let identifier = present(&form.username).or(present(&form.email));
    let (identifier, password) = match (identifier, present(&form.password)) {
        (Some(identifier), Some(password)) => (identifier, password),
        _ => return Err(missing_fields()),
    };
    tracing::info!("Login attempt for user: {}", identifier);

    let users = state.users.lock().await;
    let user = users
        .authenticate(identifier, password)
        .map_err(|e| ApiError::from(e).as_message())?;

    state.sessions.save(&Identity::from(user));

    Ok(Json(json!({
        "message": "Login successful",
        "user": user,
    }))
    .into_response())
}

#[axum::debug_handler]
pub async fn handle_logout(State(state): State<AppState>) -> ApiResult<Response> {
    state
        .sessions
        .clear()
        .map_err(|e| ApiError::from(AppError::from(e)).with_message("Failed to logout"))?;

    Ok(Json(json!({ "message": "Logged out successfully" })).into_response())
}

// Register and login answer missing fields with 200 and an error body
fn missing_fields() -> ApiError {
    ApiError::from(AppError::Validation(
        "Username, email, and password are required!!".into(),
    ))
    .with_status(StatusCode::OK)
}
