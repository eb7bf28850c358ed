//! Domain layer for the todo service.
//!
//! Holds the shared types, the error type, and the payload validation and
//! filter rules used by the API. Nothing in this crate performs I/O.

pub mod error;
pub mod nullable;
pub mod todo;
pub mod types;
