//! Todo entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use todo_core::types::{DbId, Timestamp};

/// A todo row from the `todos` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub deadline_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new todo.
///
/// Server-managed columns (`id`, `created_at`, `updated_at`) are ignored if sent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "todo_core::todo::deserialize_deadline")]
    pub deadline_at: Option<Timestamp>,
}

/// DTO for partially updating a todo. Absent fields keep their stored value.
///
/// Nullable columns use `Option<Option<T>>` so an explicit `null` clears them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "todo_core::nullable::deserialize")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "todo_core::todo::deserialize_deadline_patch")]
    pub deadline_at: Option<Option<Timestamp>>,
}
