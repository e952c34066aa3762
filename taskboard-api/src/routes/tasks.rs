/// Task endpoints
///
/// Every handler is scoped to the signed-in account. A task that belongs to
/// someone else, and an identifier that doesn't parse, both answer `404`
/// exactly like a task that doesn't exist.
///
/// - `GET /tasks`: Newest first
/// - `POST /tasks`: Create
/// - `GET /tasks/board`: Status columns
/// - `GET /tasks/:id`, `PUT /tasks/:id`, `DELETE /tasks/:id`
/// - `PATCH /tasks/:id/status`: Board drag-and-drop

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::{
    models::task::Task,
    services::Board,
    validation::{TaskForm, ValidationErrors},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    session::AuthUser,
};

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

fn task_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

pub async fn list_tasks(State(state): State<AppState>, AuthUser(identity): AuthUser) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list(&identity).await?))
}

/// Create a task owned by the caller
///
/// ```text
/// POST /tasks
///
/// { "title": "Write report", "priority": "high", "dueDate": "2026-11-02" }
/// ```
///
/// # Errors
///
/// - `422`: Field errors
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(value) = payload?;
    let form = TaskForm::from_value(&value)?;

    let task = state.tasks.create(&identity, form).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn board(State(state): State<AppState>, AuthUser(identity): AuthUser) -> ApiResult<Json<Board>> {
    Ok(Json(state.tasks.board(&identity).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let id = task_id(&id)?;
    Ok(Json(state.tasks.get(&identity, id).await?))
}

/// Full update; the body is validated like a create
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = task_id(&id)?;
    let Json(value) = payload?;
    let form = TaskForm::from_value(&value)?;

    Ok(Json(state.tasks.update(&identity, id, form).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = task_id(&id)?;
    state.tasks.delete(&identity, id).await?;

    Ok(Json(DeleteResponse { success: true }))
}

/// Move a task to another column
///
/// ```text
/// PATCH /tasks/:id/status
///
/// { "status": "in-progress" }
/// ```
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = task_id(&id)?;
    let Json(value) = payload?;

    let Some(status) = TaskForm::from_value(&value)?.status else {
        return Err(ValidationErrors::single("status", "Status is required").into());
    };

    Ok(Json(state.tasks.move_status(&identity, id, &status).await?))
}
