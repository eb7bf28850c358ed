//! Query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /todos` (`?completed=&window=`).
///
/// `completed` is kept as the raw string: only a case-insensitive `"true"`
/// enables the filter, every other value is ignored. `window` is a number of
/// days; zero (the default) disables the deadline filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListTodosParams {
    pub completed: Option<String>,
    #[serde(default)]
    pub window: u64,
}
