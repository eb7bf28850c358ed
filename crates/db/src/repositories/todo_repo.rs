//! Repository for the `todos` table.

use sqlx::PgPool;
use todo_core::todo::TodoFilter;
use todo_core::types::DbId;

use crate::models::todo::{CreateTodo, Todo, UpdateTodo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, completed, deadline_at, created_at, updated_at";

/// Provides CRUD operations for todos.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new todo, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTodo) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, description, completed, deadline_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.completed)
            .bind(input.deadline_at)
            .fetch_one(pool)
            .await
    }

    /// Find a todo by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List todos matching `filter`, in insertion (id) order.
    ///
    /// The deadline cutoff is inclusive; todos without a deadline never match it.
    pub async fn list(pool: &PgPool, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM todos
             WHERE ($1::BOOL IS NULL OR completed = $1)
               AND ($2::TIMESTAMPTZ IS NULL OR deadline_at <= $2)
             ORDER BY id"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(filter.completed)
            .bind(filter.deadline_cutoff)
            .fetch_all(pool)
            .await
    }

    /// Update a todo. Only fields present in `input` are applied.
    ///
    /// `description` and `deadline_at` use `Option<Option<_>>`: the outer
    /// `Some` marks the field as provided, an inner `None` clears the column.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTodo,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let description_provided = input.description.is_some();
        let description_value = input.description.as_ref().and_then(|v| v.as_deref());
        let deadline_provided = input.deadline_at.is_some();
        let deadline_value = input.deadline_at.flatten();

        let query = format!(
            "UPDATE todos SET
                title       = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                completed   = COALESCE($5, completed),
                deadline_at = CASE WHEN $6 THEN $7 ELSE deadline_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(description_provided)
            .bind(description_value)
            .bind(input.completed)
            .bind(deadline_provided)
            .bind(deadline_value)
            .fetch_optional(pool)
            .await
    }

    /// Delete a todo by ID, returning the removed row if there was one.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("DELETE FROM todos WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
