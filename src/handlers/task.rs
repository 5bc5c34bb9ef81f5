use axum::{
    extract::{Query, State},
    http::StatusCode,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use crate::errors::{ApiError, ApiResult, AppError};
use crate::middleware::CurrentSession;
use crate::models::{present, SearchQuery, TaskForm, TaskIdQuery};
use crate::services::NewTask;
use crate::state::AppState;
use super::form_or_default;

pub async fn list_tasks(State(state): State<AppState>) -> Response {
    let tasks = state.tasks.lock().await;
    Json(tasks.list()).into_response()
}

pub async fn search_tasks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Response> {
    let found = state
        .tasks
        .lock()
        .await
        .search(present(&query.keyword))
        // A missing keyword is reported with 200
        .map_err(|e| ApiError::from(e).with_status(StatusCode::OK))?;

    Ok(Json(found).into_response())
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    payload: Result<Json<TaskForm>, JsonRejection>,
) -> ApiResult<Response> {
    let form = form_or_default(payload);
    let input = NewTask {
        title: present(&form.title),
        description: present(&form.description),
        priority: present(&form.priority),
    };

    let task = state
        .tasks
        .lock()
        .await
        .create(input, session.identity())
        .map_err(|e| match e {
            AppError::Validation(_) => ApiError::from(e).with_status(StatusCode::OK),
            other => ApiError::from(other),
        })?;

    Ok((StatusCode::CREATED, Json(task)).into_response())
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<TaskIdQuery>,
) -> ApiResult<Response> {
    state
        .tasks
        .lock()
        .await
        .delete(present(&query.id), session.identity())
        .map_err(|e| match e {
            AppError::NotFound(_) => ApiError::from(e),
            other => ApiError::from(other).with_status(StatusCode::BAD_REQUEST),
        })?;

    Ok(Json(json!({ "message": "Task deleted!" })).into_response())
}
