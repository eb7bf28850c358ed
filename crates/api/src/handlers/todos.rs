//! Handlers for the `/todos` resource.
//!
//! Create and update take the body as raw JSON so its shape and field names can
//! be checked against the todo columns before it is deserialized into a DTO.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use todo_core::error::CoreError;
use todo_core::todo::{self, TodoFilter};
use todo_core::types::DbId;
use todo_db::models::todo::{CreateTodo, Todo, UpdateTodo};
use todo_db::repositories::TodoRepo;

use crate::error::{AppError, AppResult};
use crate::query::ListTodosParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: todo::ENTITY,
        id,
    })
}

/// Deserialize an already-validated payload into its DTO.
fn into_dto<T: DeserializeOwned>(payload: Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(payload))
        .map_err(|e| AppError::BadRequest(format!("Invalid todo payload: {e}")))
}

/// GET /api/v1/todos?completed=&window=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListTodosParams>,
) -> AppResult<Json<Vec<Todo>>> {
    let filter = TodoFilter::from_query(params.completed.as_deref(), params.window, Utc::now());
    let todos = TodoRepo::list(&state.pool, &filter).await?;
    Ok(Json(todos))
}

/// GET /api/v1/todos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Todo>> {
    let todo = TodoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(todo))
}

/// POST /api/v1/todos
///
/// The title check runs before the unknown-field check.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let payload = todo::into_object(body)?;
    todo::require_title(&payload)?;
    todo::reject_unknown_fields(&payload)?;

    let input: CreateTodo = into_dto(payload)?;
    let todo = TodoRepo::create(&state.pool, &input).await?;

    tracing::info!(todo_id = todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/v1/todos/{id}
///
/// Checks run in order: body shape, unknown fields, existence, id immutability, values.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<Todo>> {
    let payload = todo::into_object(body)?;
    todo::reject_unknown_fields(&payload)?;

    if TodoRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    todo::check_id_unchanged(&payload, id)?;
    todo::validate_patch(&payload)?;

    let input: UpdateTodo = into_dto(payload)?;
    let todo = TodoRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(todo_id = id, "Todo updated");
    Ok(Json(todo))
}

/// DELETE /api/v1/todos/{id}
///
/// Deleting a missing todo is not an error: it answers `200 {}`.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    match TodoRepo::delete(&state.pool, id).await? {
        Some(todo) => {
            tracing::info!(todo_id = id, "Todo deleted");
            Ok(Json(todo).into_response())
        }
        None => Ok(Json(json!({})).into_response()),
    }
}
